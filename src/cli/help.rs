//! CLI command-name contract for logging and routing.

use crate::cli::parse::{Commands, ContractKind};

/// Command name string for log spans (e.g. "analyze", "schema.blueprint").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Analyze { .. } => "analyze",
        Commands::Blueprint { .. } => "blueprint",
        Commands::Domains => "domains",
        Commands::Schema { contract } => match contract {
            ContractKind::Analysis => "schema.analysis",
            ContractKind::Blueprint => "schema.blueprint",
        },
        Commands::Status { .. } => "status",
    }
}

/// Whether the command calls the remote model and so needs credentials.
pub fn requires_provider(command: &Commands) -> bool {
    matches!(command, Commands::Analyze { .. } | Commands::Blueprint { .. })
}
