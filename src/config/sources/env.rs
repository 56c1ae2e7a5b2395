//! Environment sources: `AEGIS_SECTION__KEY` overrides and API keys.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Variables read for API keys, in priority order. `AEGIS_API_KEYS` is comma-separated.
pub const API_KEY_VARS: [&str; 3] = ["AEGIS_API_KEYS", "AEGIS_API_KEY", "GEMINI_API_KEY"];

/// Add `AEGIS_` overrides, e.g. `AEGIS_EXECUTOR__BACKOFF_MS=500`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("AEGIS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    ))
}

/// API keys from the environment, in variable order.
pub fn api_keys_from_env() -> Vec<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .flat_map(|value| {
            value
                .split(',')
                .map(|key| key.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|key| !key.is_empty())
        .collect()
}
