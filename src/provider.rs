//! Generation Provider
//!
//! The remote collaborator that turns a prompt plus a declarative response schema
//! into JSON text. The generation layer depends only on the [`GenerationClient`]
//! trait; [`GeminiClient`] is the HTTP implementation.

use crate::credentials::Credential;
use crate::error::AegisError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One request to the remote model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationCall {
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// Declarative schema the model output is constrained to
    pub response_schema: Value,
}

/// Raw model output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationResponse {
    /// JSON-encoded payload; `None` when the model returned nothing
    pub text: Option<String>,
    pub finish_reason: Option<String>,
}

impl GenerationResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: Some("STOP".to_string()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Failure reported by the remote call, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status, if the failure came from a response
    pub status: Option<u16>,
    pub reason: String,
}

impl RemoteError {
    pub fn new(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    pub fn quota(reason: impl Into<String>) -> Self {
        Self::new(Some(429), reason)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {}", status, self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Remote generation call, parameterized by credential
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Issue one generation call with the given credential
    async fn generate(
        &self,
        credential: &Credential,
        call: &GenerationCall,
    ) -> Result<GenerationResponse, RemoteError>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}

// Gemini generateContent response structures
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

// Helper function to map transport errors to RemoteError
fn map_http_error(error: reqwest::Error) -> RemoteError {
    let status = error.status().map(|s| s.as_u16());
    if error.is_timeout() {
        RemoteError::new(status, format!("Request timeout: {}", error))
    } else if error.is_connect() {
        RemoteError::new(status, format!("Connection error: {}", error))
    } else {
        RemoteError::new(status, format!("HTTP error: {}", error))
    }
}

/// Build the generateContent request body
fn build_request_body(call: &GenerationCall) -> Value {
    let mut body = json!({
        "contents": [
            { "role": "user", "parts": [{ "text": call.prompt }] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": call.response_schema,
        },
    });
    if let Some(instruction) = &call.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    body
}

/// Concatenate the text parts of the first candidate.
fn extract_response(raw: GenerateContentResponse) -> GenerationResponse {
    let Some(candidate) = raw.candidates.into_iter().next() else {
        return GenerationResponse::empty();
    };
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    GenerationResponse {
        text: (!text.is_empty()).then_some(text),
        finish_reason: candidate.finish_reason,
    }
}

/// Turn a non-success body into a reason string, keeping the provider status tag.
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let message = envelope
                .error
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            match envelope.error.status {
                Some(status) => format!("{}: {}", status, message),
                None => message,
            }
        }
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Gemini generateContent client
pub struct GeminiClient {
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(model: String, base_url: Option<String>) -> Result<Self, AegisError> {
        Self::with_timeouts(
            model,
            base_url,
            PROVIDER_HTTP_CONNECT_TIMEOUT,
            PROVIDER_HTTP_REQUEST_TIMEOUT,
        )
    }

    pub fn with_timeouts(
        model: String,
        base_url: Option<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, AegisError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                AegisError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            model,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        credential: &Credential,
        call: &GenerationCall,
    ) -> Result<GenerationResponse, RemoteError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential.expose())
            .json(&build_request_body(call))
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::new(
                Some(status.as_u16()),
                describe_error_body(&body),
            ));
        }

        let raw: GenerateContentResponse = response.json().await.map_err(|e| {
            RemoteError::new(None, format!("Failed to parse provider response: {}", e))
        })?;

        Ok(extract_response(raw))
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
