//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the generation service.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, requires_provider};
pub use output::map_error;
pub use parse::{Cli, Commands, ContractKind};
pub use presentation::{
    format_analysis_text, format_blueprint_text, format_status_text, StatusReport,
};
pub use route::RunContext;
