//! Configuration System
//!
//! Layered configuration for credentials, the remote provider, the retry policy
//! and logging. Files and environment overrides are merged by [`ConfigLoader`];
//! [`AegisConfig::validate`] reports every problem at once.

use crate::credentials::CredentialPool;
use crate::error::AegisError;
use crate::executor::{ExecutionPolicy, DEFAULT_ATTEMPTS_PER_CREDENTIAL, DEFAULT_BACKOFF};
use crate::logging::LoggingConfig;
use crate::provider::{GeminiClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use merge::merge_policy::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use sources::env::{api_keys_from_env, API_KEY_VARS};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AegisConfig {
    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub executor: ExecutorSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API keys, in rotation order
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub api_keys: Vec<String>,
}

impl CredentialsConfig {
    /// Append keys after the existing ones, keeping first occurrences only.
    pub fn append(&mut self, keys: impl IntoIterator<Item = String>) {
        self.api_keys.extend(keys);
        self.dedup();
    }

    /// Drop blank and repeated keys, preserving order.
    pub fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.api_keys = self
            .api_keys
            .drain(..)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && seen.insert(key.clone()))
            .collect();
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_keys", &format!("<{} redacted>", self.api_keys.len()))
            .finish()
    }
}

/// Remote model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ProviderSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!(
                "Endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            ));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("Timeouts must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Retry policy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSettings {
    /// Pause after a full rotation cycle, in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Attempts allowed per credential. The default of 2 gives the standard
    /// budget of twice the pool size; any other value changes that bound and
    /// is accepted only as an explicit override.
    #[serde(default = "default_attempts_per_credential")]
    pub attempts_per_credential: usize,

    /// Optional bound on one call including retries, in seconds
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

fn default_backoff_ms() -> u64 {
    DEFAULT_BACKOFF.as_millis() as u64
}

fn default_attempts_per_credential() -> usize {
    DEFAULT_ATTEMPTS_PER_CREDENTIAL
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            backoff_ms: default_backoff_ms(),
            attempts_per_credential: default_attempts_per_credential(),
            deadline_secs: None,
        }
    }
}

impl ExecutorSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.attempts_per_credential == 0 {
            return Err("attempts_per_credential must be at least 1".to_string());
        }
        if self.deadline_secs == Some(0) {
            return Err("deadline_secs must be greater than zero when set".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    Provider(String),
    Executor(String),
    Logging(String),
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigIssue::Provider(msg) => write!(f, "Provider: {}", msg),
            ConfigIssue::Executor(msg) => write!(f, "Executor: {}", msg),
            ConfigIssue::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ConfigIssue {}

impl AegisConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ConfigIssue>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ConfigIssue::Provider(e));
        }
        if let Err(e) = self.executor.validate() {
            errors.push(ConfigIssue::Executor(e));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ConfigIssue::Logging(format!(
                "Invalid format '{}'",
                self.logging.format
            )));
        }
        if !matches!(self.logging.output.as_str(), "stdout" | "stderr" | "file") {
            errors.push(ConfigIssue::Logging(format!(
                "Invalid output '{}'",
                self.logging.output
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every issue into one configuration error.
    pub fn ensure_valid(&self) -> Result<(), AegisError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            AegisError::Configuration(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }

    pub fn credential_pool(&self) -> Result<CredentialPool, AegisError> {
        CredentialPool::new(&self.credentials.api_keys)
    }

    pub fn executor_policy(&self) -> ExecutionPolicy {
        ExecutionPolicy {
            backoff: Duration::from_millis(self.executor.backoff_ms),
            attempts_per_credential: self.executor.attempts_per_credential,
            deadline: self.executor.deadline_secs.map(Duration::from_secs),
        }
    }

    pub fn gemini_client(&self) -> Result<GeminiClient, AegisError> {
        GeminiClient::with_timeouts(
            self.provider.model.clone(),
            Some(self.provider.endpoint.clone()),
            Duration::from_secs(self.provider.connect_timeout_secs),
            Duration::from_secs(self.provider.request_timeout_secs),
        )
    }
}
