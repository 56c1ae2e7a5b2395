//! Request Executor
//!
//! Runs one generation call against the credential pool: quota failures rotate to
//! the next credential (pausing after a full cycle), every other failure is
//! terminal, and a successful payload must satisfy its schema contract before it
//! is returned.

use crate::credentials::{Credential, CredentialPool, Rotation};
use crate::error::{AegisError, ValidationError};
use crate::provider::{GenerationCall, GenerationClient, GenerationResponse, RemoteError};
use crate::schema::SchemaContract;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Pause before retrying once every credential has been tried
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);

/// Attempts allowed per credential in the pool
pub const DEFAULT_ATTEMPTS_PER_CREDENTIAL: usize = 2;

/// Retry decision for a remote failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Quota exhausted: rotate and try again
    Retriable,
    /// Anything else: surface immediately
    Fatal,
}

/// Classify a remote failure. Only quota exhaustion is retriable.
pub fn classify(error: &RemoteError) -> FailureClass {
    let reason = error.reason.to_ascii_lowercase();
    if error.status == Some(429) || reason.contains("429") || reason.contains("exhausted") {
        FailureClass::Retriable
    } else {
        FailureClass::Fatal
    }
}

/// Maximum remote calls for a pool of `pool_size` credentials
pub fn attempt_budget(pool_size: usize, attempts_per_credential: usize) -> usize {
    pool_size.max(1) * attempts_per_credential.max(1)
}

/// Whether a rotation must be followed by a pause before the next attempt
pub fn needs_backoff(rotation: Rotation, pool_size: usize) -> bool {
    rotation.wrapped || pool_size == 1
}

/// Retry policy for an executor
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPolicy {
    pub backoff: Duration,
    pub attempts_per_credential: usize,
    /// Upper bound on the whole retry loop, backoffs included
    pub deadline: Option<Duration>,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            backoff: DEFAULT_BACKOFF,
            attempts_per_credential: DEFAULT_ATTEMPTS_PER_CREDENTIAL,
            deadline: None,
        }
    }
}

/// Per-call state machine
#[derive(Debug)]
enum ExecutionState {
    Attempting { index: usize, credential: Credential },
    RotateWait,
    Done(GenerationResponse),
    Failed(AegisError),
}

/// Executes generation calls with credential rotation and bounded retries.
pub struct RequestExecutor {
    pool: Arc<CredentialPool>,
    client: Arc<dyn GenerationClient>,
    policy: ExecutionPolicy,
}

impl RequestExecutor {
    pub fn new(pool: Arc<CredentialPool>, client: Arc<dyn GenerationClient>) -> Self {
        Self::with_policy(pool, client, ExecutionPolicy::default())
    }

    pub fn with_policy(
        pool: Arc<CredentialPool>,
        client: Arc<dyn GenerationClient>,
        policy: ExecutionPolicy,
    ) -> Self {
        Self {
            pool,
            client,
            policy,
        }
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    pub fn policy(&self) -> &ExecutionPolicy {
        &self.policy
    }

    pub fn attempt_budget(&self) -> usize {
        attempt_budget(self.pool.len(), self.policy.attempts_per_credential)
    }

    /// Run `call` to completion and return the validated JSON payload.
    pub async fn execute(
        &self,
        call: &GenerationCall,
        contract: &SchemaContract,
    ) -> Result<Value, AegisError> {
        self.execute_prepared(call, contract, |_| {}).await
    }

    /// Like [`execute`](Self::execute), but `prepare` rewrites the parsed payload
    /// before it is checked against `contract`. Fields the caller owns (such as a
    /// stamped domain) are settled here so the model's version is never validated.
    pub async fn execute_prepared<F>(
        &self,
        call: &GenerationCall,
        contract: &SchemaContract,
        prepare: F,
    ) -> Result<Value, AegisError>
    where
        F: Fn(&mut Value) + Send + Sync,
    {
        match self.policy.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(call, contract, &prepare))
                .await
                .map_err(|_| AegisError::DeadlineExceeded(deadline))?,
            None => self.run(call, contract, &prepare).await,
        }
    }

    async fn run<F>(
        &self,
        call: &GenerationCall,
        contract: &SchemaContract,
        prepare: &F,
    ) -> Result<Value, AegisError>
    where
        F: Fn(&mut Value) + Send + Sync,
    {
        let budget = self.attempt_budget();
        let pool_size = self.pool.len();
        let mut attempts = 0usize;
        let mut state = self.attempting();

        loop {
            state = match state {
                ExecutionState::Attempting { index, credential } => {
                    attempts += 1;
                    debug!(
                        contract = contract.name(),
                        attempt = attempts,
                        budget,
                        credential_index = index,
                        credential = %credential,
                        "Issuing generation call"
                    );
                    match self.client.generate(&credential, call).await {
                        Ok(response) => ExecutionState::Done(response),
                        Err(err) => match classify(&err) {
                            FailureClass::Fatal => {
                                warn!(
                                    contract = contract.name(),
                                    attempt = attempts,
                                    error = %err,
                                    "Generation call failed; not retrying"
                                );
                                ExecutionState::Failed(AegisError::Request(err.to_string()))
                            }
                            FailureClass::Retriable => {
                                let rotation = self.pool.rotate_from(index);
                                warn!(
                                    contract = contract.name(),
                                    attempt = attempts,
                                    credential_index = index,
                                    next_index = rotation.index,
                                    wrapped = rotation.wrapped,
                                    "Quota exceeded; rotating credential"
                                );
                                let quota_error = AegisError::QuotaExceeded(err.to_string());
                                if attempts >= budget {
                                    ExecutionState::Failed(quota_error)
                                } else if needs_backoff(rotation, pool_size) {
                                    ExecutionState::RotateWait
                                } else {
                                    self.attempting()
                                }
                            }
                        },
                    }
                }
                ExecutionState::RotateWait => {
                    info!(
                        backoff_ms = self.policy.backoff.as_millis() as u64,
                        "All credentials exhausted this cycle; backing off"
                    );
                    sleep(self.policy.backoff).await;
                    self.attempting()
                }
                ExecutionState::Done(response) => {
                    let payload = decode_payload(response, contract, prepare)?;
                    debug!(
                        contract = contract.name(),
                        attempts, "Generation call succeeded"
                    );
                    return Ok(payload);
                }
                ExecutionState::Failed(err) => {
                    warn!(
                        contract = contract.name(),
                        attempts,
                        kind = err.kind(),
                        error = %err,
                        "Generation call failed"
                    );
                    return Err(err);
                }
            };
        }
    }

    fn attempting(&self) -> ExecutionState {
        let (index, credential) = self.pool.checkout();
        ExecutionState::Attempting { index, credential }
    }
}

/// Parse the raw response text and check it against the contract.
fn decode_payload<F>(
    response: GenerationResponse,
    contract: &SchemaContract,
    prepare: &F,
) -> Result<Value, AegisError>
where
    F: Fn(&mut Value),
{
    let text = match response.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            return Err(AegisError::EmptyResponse(format!(
                "No payload received for {} (finish reason: {})",
                contract.name(),
                response.finish_reason.as_deref().unwrap_or("unknown")
            )))
        }
    };

    let mut value: Value = serde_json::from_str(&text).map_err(|e| {
        ValidationError::new("$", format!("response is not valid JSON: {}", e))
    })?;
    prepare(&mut value);
    contract.validate(&value)?;
    Ok(value)
}
