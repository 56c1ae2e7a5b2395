//! Merge rules: built-in defaults sit beneath every other source.

use crate::executor::{DEFAULT_ATTEMPTS_PER_CREDENTIAL, DEFAULT_BACKOFF};
use crate::provider::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("provider.model", DEFAULT_MODEL)?
        .set_default("provider.endpoint", DEFAULT_ENDPOINT)?
        .set_default("provider.connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS)?
        .set_default("provider.request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
        .set_default("executor.backoff_ms", DEFAULT_BACKOFF.as_millis() as u64)?
        .set_default(
            "executor.attempts_per_credential",
            DEFAULT_ATTEMPTS_PER_CREDENTIAL as u64,
        )
}
