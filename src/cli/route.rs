//! CLI route: single route table and run context. Dispatches to the generation
//! service and presentation.

use crate::cli::help::{command_name, requires_provider};
use crate::cli::parse::{Commands, ContractKind};
use crate::cli::presentation::{
    format_analysis_text, format_blueprint_text, format_section_heading, format_status_text,
    to_json, StatusReport,
};
use crate::config::{AegisConfig, ConfigLoader};
use crate::error::AegisError;
use crate::generation::GenerationService;
use crate::report::render_markdown;
use crate::schema::SchemaContract;
use crate::types::{
    AnalysisRequest, EnvironmentalConditions, PhysicalProperties, PhysicsDomain,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded configuration and, for commands
/// that call the model, the generation service.
pub struct RunContext {
    config: AegisConfig,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, AegisError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(config, workspace_root))
    }

    pub fn with_config(config: AegisConfig, workspace_root: PathBuf) -> Self {
        Self {
            config,
            workspace_root,
        }
    }

    pub fn config(&self) -> &AegisConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, command: &Commands) -> Result<String, AegisError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = name, workspace = %self.workspace_root.display(), "Dispatching command");

        let service = if requires_provider(command) {
            Some(GenerationService::from_config(&self.config)?)
        } else {
            None
        };
        let result = self.execute_inner(command, service.as_ref()).await;

        info!(
            command = name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    async fn execute_inner(
        &self,
        command: &Commands,
        service: Option<&GenerationService>,
    ) -> Result<String, AegisError> {
        match command {
            Commands::Analyze {
                description,
                domain,
                width,
                height,
                depth,
                material,
                temperature,
                pressure,
                gravity,
                humidity,
                wind_speed,
                atmosphere,
                format,
            } => {
                let mut request = AnalysisRequest::new(description.clone(), *domain);
                if let (Some(width), Some(height), Some(depth)) = (width, height, depth) {
                    request = request.with_physical_properties(PhysicalProperties {
                        width: *width,
                        height: *height,
                        depth: *depth,
                        material: material.clone().unwrap_or_else(|| "Unspecified".to_string()),
                    });
                }
                let environment = build_environment(
                    *temperature,
                    *pressure,
                    *gravity,
                    *humidity,
                    *wind_speed,
                    atmosphere.as_deref(),
                );
                if let Some(environment) = environment {
                    request = request.with_environment(environment);
                }

                let result = require_service(service)?.analyze_idea(&request).await?;
                match format.as_str() {
                    "json" => to_json(&result),
                    "markdown" => Ok(render_markdown(&result, chrono::Utc::now())),
                    _ => Ok(format_analysis_text(&result)),
                }
            }
            Commands::Blueprint {
                description,
                format,
            } => {
                let parts = require_service(service)?
                    .generate_blueprint(description)
                    .await?;
                if format == "json" {
                    to_json(&parts)
                } else {
                    Ok(format_blueprint_text(&parts))
                }
            }
            Commands::Domains => Ok(format_domains()),
            Commands::Schema { contract } => {
                let contract = match contract {
                    ContractKind::Analysis => SchemaContract::analysis(),
                    ContractKind::Blueprint => SchemaContract::blueprint(),
                };
                to_json(&contract.response_schema())
            }
            Commands::Status { format } => {
                let report = StatusReport::from_config(&self.config);
                match format.as_str() {
                    "json" => to_json(&report),
                    "toml" => toml::to_string_pretty(&report).map_err(|e| {
                        AegisError::Request(format!("Failed to serialize output: {}", e))
                    }),
                    _ => Ok(format_status_text(&report)),
                }
            }
        }
    }
}

fn require_service(service: Option<&GenerationService>) -> Result<&GenerationService, AegisError> {
    service.ok_or_else(|| {
        AegisError::Configuration("Generation service is not initialized".to_string())
    })
}

/// Start from standard Earth conditions and apply whichever values were given.
fn build_environment(
    temperature: Option<f64>,
    pressure: Option<f64>,
    gravity: Option<f64>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    atmosphere: Option<&str>,
) -> Option<EnvironmentalConditions> {
    let any_given = [temperature, pressure, gravity, humidity, wind_speed]
        .iter()
        .any(Option::is_some)
        || atmosphere.is_some();
    if !any_given {
        return None;
    }

    let mut env = EnvironmentalConditions::default();
    if let Some(v) = temperature {
        env.temperature = v;
    }
    if let Some(v) = pressure {
        env.pressure = v;
    }
    if let Some(v) = gravity {
        env.gravity = v;
    }
    if let Some(v) = humidity {
        env.humidity = v;
    }
    if let Some(v) = wind_speed {
        env.wind_speed = v;
    }
    if let Some(v) = atmosphere {
        env.atmosphere = v.to_string();
    }
    Some(env)
}

fn format_domains() -> String {
    let mut out = format!("{}\n\n", format_section_heading("Physics domains"));
    for domain in PhysicsDomain::ALL {
        out.push_str(&format!("  {}\n", domain));
    }
    out.push_str(&format!("\n{} domains", PhysicsDomain::ALL.len()));
    out
}
