//! Loader facade: assembles the layered sources into an [`AegisConfig`].

use super::merge::merge_policy;
use super::sources::{env, global_file, workspace_file};
use super::AegisConfig;
use config::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Sources, lowest to highest precedence: built-in defaults, the global
    /// file, `config/config.toml`, `config/{AEGIS_ENV}.toml`, then `AEGIS_`
    /// environment overrides. Environment API keys are appended to any
    /// configured ones.
    pub fn load(workspace_root: &Path) -> Result<AegisConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = env::add_to_builder(builder)?;

        let mut config: AegisConfig = builder.build()?.try_deserialize()?;
        config.credentials.append(env::api_keys_from_env());
        debug!(
            workspace = %workspace_root.display(),
            credentials = config.credentials.api_keys.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load a single file on top of the defaults. Only environment API keys are
    /// layered over it; the global and workspace files are skipped.
    pub fn load_from_file(path: &Path) -> Result<AegisConfig, ConfigError> {
        let mut config: AegisConfig = merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        config.credentials.append(env::api_keys_from_env());
        Ok(config)
    }

    /// Global config path, honoring `XDG_CONFIG_HOME`.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
