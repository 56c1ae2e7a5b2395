//! CLI parse: clap types for Aegis. No behavior; definitions only.

use crate::types::PhysicsDomain;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Aegis CLI - physics-grounded feasibility analysis and blueprint synthesis
#[derive(Parser)]
#[command(name = "aegis")]
#[command(about = "Physics-grounded feasibility analysis and CAD blueprint synthesis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/config.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate the physical feasibility of an idea
    Analyze {
        /// The idea to evaluate
        description: String,

        /// Physics domain to focus on (e.g. "Thermodynamics", "fluid-dynamics")
        #[arg(long, default_value = "General")]
        domain: PhysicsDomain,

        /// Width in metres
        #[arg(long, requires_all = ["height", "depth"])]
        width: Option<f64>,

        /// Height in metres
        #[arg(long, requires_all = ["width", "depth"])]
        height: Option<f64>,

        /// Depth in metres
        #[arg(long, requires_all = ["width", "height"])]
        depth: Option<f64>,

        /// Primary material (requires dimensions)
        #[arg(long, requires = "width")]
        material: Option<String>,

        /// Ambient temperature in Celsius
        #[arg(long, allow_hyphen_values = true)]
        temperature: Option<f64>,

        /// Atmospheric pressure in atm
        #[arg(long)]
        pressure: Option<f64>,

        /// Gravity in m/s²
        #[arg(long)]
        gravity: Option<f64>,

        /// Relative humidity in percent
        #[arg(long)]
        humidity: Option<f64>,

        /// Wind speed in m/s
        #[arg(long)]
        wind_speed: Option<f64>,

        /// Atmosphere composition (e.g. "Mars CO2", "Vacuum")
        #[arg(long)]
        atmosphere: Option<String>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json", "markdown"])]
        format: String,
    },
    /// Decompose an object into geometric primitives
    Blueprint {
        /// The object to visualize
        description: String,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// List the supported physics domains
    Domains,
    /// Print the response schema sent to the model for a contract
    Schema {
        #[arg(value_enum)]
        contract: ContractKind,
    },
    /// Show credentials, provider and retry policy
    Status {
        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json", "toml"])]
        format: String,
    },
}

/// Output contracts exposed by `aegis schema`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContractKind {
    Analysis,
    Blueprint,
}
