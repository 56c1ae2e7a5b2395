//! Generation Service
//!
//! The two typed operations callers use: idea analysis and blueprint synthesis.
//! Each builds its prompt, runs it through the [`RequestExecutor`] with the
//! matching [`SchemaContract`], and decodes the validated payload. No recovery
//! happens here; executor errors pass through unchanged.

use crate::config::AegisConfig;
use crate::error::{AegisError, ValidationError};
use crate::executor::RequestExecutor;
use crate::provider::GenerationCall;
use crate::schema::SchemaContract;
use crate::types::{
    AnalysisRequest, AnalysisResult, BlueprintPart, BlueprintRequest, GenerationOutcome,
    GenerationRequest,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

pub mod prompts;

pub struct GenerationService {
    executor: RequestExecutor,
    analysis_contract: SchemaContract,
    blueprint_contract: SchemaContract,
}

impl GenerationService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self {
            executor,
            analysis_contract: SchemaContract::analysis(),
            blueprint_contract: SchemaContract::blueprint(),
        }
    }

    /// Wire the Gemini client, credential pool and retry policy from configuration.
    pub fn from_config(config: &AegisConfig) -> Result<Self, AegisError> {
        config.ensure_valid()?;
        let pool = Arc::new(config.credential_pool()?);
        let client = Arc::new(config.gemini_client()?);
        Ok(Self::new(RequestExecutor::with_policy(
            pool,
            client,
            config.executor_policy(),
        )))
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Evaluate an idea. The requested domain is always stamped onto the result.
    #[instrument(skip_all, fields(domain = %request.domain))]
    pub async fn analyze_idea(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AegisError> {
        request.validate()?;

        let call = GenerationCall {
            prompt: prompts::analysis_prompt(request),
            system_instruction: Some(prompts::ANALYSIS_SYSTEM_INSTRUCTION.to_string()),
            response_schema: self.analysis_contract.response_schema(),
        };
        let label = request.domain.label();
        let raw = self
            .executor
            .execute_prepared(&call, &self.analysis_contract, |payload| {
                if let Some(object) = payload.as_object_mut() {
                    object.insert("domain".to_string(), Value::String(label.to_string()));
                }
            })
            .await?;
        let result: AnalysisResult = decode(raw)?;

        info!(verdict = %result.verdict, risk_score = result.risk_score, "Analysis complete");
        Ok(result)
    }

    /// Decompose a description into at most twelve primitives. An empty list is
    /// a successful outcome.
    #[instrument(skip_all)]
    pub async fn generate_blueprint(&self, description: &str) -> Result<Vec<BlueprintPart>, AegisError> {
        let request = BlueprintRequest::new(description);
        request.validate()?;

        let call = GenerationCall {
            prompt: prompts::blueprint_prompt(&request.description),
            system_instruction: None,
            response_schema: self.blueprint_contract.response_schema(),
        };
        let raw = self.executor.execute(&call, &self.blueprint_contract).await?;
        let parts: Vec<BlueprintPart> = decode(raw)?;

        info!(parts = parts.len(), "Blueprint complete");
        Ok(parts)
    }

    /// Dispatch a tagged request to the matching operation.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome, AegisError> {
        match request {
            GenerationRequest::Analysis(analysis) => self
                .analyze_idea(&analysis)
                .await
                .map(GenerationOutcome::Analysis),
            GenerationRequest::Blueprint(blueprint) => self
                .generate_blueprint(&blueprint.description)
                .await
                .map(GenerationOutcome::Blueprint),
        }
    }
}

/// Decode a contract-validated payload into its typed form.
fn decode<T: DeserializeOwned>(raw: Value) -> Result<T, AegisError> {
    serde_json::from_value(raw)
        .map_err(|e| AegisError::Validation(ValidationError::new("$", e.to_string())))
}
