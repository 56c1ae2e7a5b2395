//! Status presentation: credentials, provider and retry policy.

use super::shared::format_section_heading;
use crate::config::AegisConfig;
use crate::credentials::Credential;
use crate::executor::attempt_budget;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::{Deserialize, Serialize};

/// Effective configuration summary. Credentials appear only as fingerprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub credentials: Vec<String>,
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub backoff_ms: u64,
    pub attempts_per_credential: usize,
    pub attempt_budget: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

impl StatusReport {
    pub fn from_config(config: &AegisConfig) -> Self {
        let credentials: Vec<String> = config
            .credentials
            .api_keys
            .iter()
            .map(|key| Credential::new(key).fingerprint())
            .collect();
        let budget = if credentials.is_empty() {
            0
        } else {
            attempt_budget(credentials.len(), config.executor.attempts_per_credential)
        };
        Self {
            credentials,
            provider: "gemini".to_string(),
            model: config.provider.model.clone(),
            endpoint: config.provider.endpoint.clone(),
            backoff_ms: config.executor.backoff_ms,
            attempts_per_credential: config.executor.attempts_per_credential,
            attempt_budget: budget,
            deadline_secs: config.executor.deadline_secs,
        }
    }
}

pub fn format_status_text(report: &StatusReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Credentials")));
    if report.credentials.is_empty() {
        out.push_str("No API keys configured. Set AEGIS_API_KEY or credentials.api_keys.\n\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["#", "Key"]);
        for (i, fingerprint) in report.credentials.iter().enumerate() {
            table.add_row(vec![(i + 1).to_string(), fingerprint.clone()]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    out.push_str(&format!("{}\n", format_section_heading("Provider")));
    out.push_str(&format!("  Provider: {}\n", report.provider));
    out.push_str(&format!("  Model: {}\n", report.model));
    out.push_str(&format!("  Endpoint: {}\n\n", report.endpoint));

    out.push_str(&format!("{}\n", format_section_heading("Retry policy")));
    out.push_str(&format!("  Backoff: {} ms\n", report.backoff_ms));
    out.push_str(&format!(
        "  Attempts per credential: {}\n",
        report.attempts_per_credential
    ));
    out.push_str(&format!("  Attempt budget: {}\n", report.attempt_budget));
    match report.deadline_secs {
        Some(secs) => out.push_str(&format!("  Deadline: {} s", secs)),
        None => out.push_str("  Deadline: none"),
    }
    out
}
