//! Shared test utilities for integration tests
//!
//! A scripted [`GenerationClient`] whose behavior is a closure over the
//! credential and call number, plus canned payloads.

use aegis::credentials::{Credential, CredentialPool};
use aegis::executor::{ExecutionPolicy, RequestExecutor};
use aegis::provider::{GenerationCall, GenerationClient, GenerationResponse, RemoteError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

type Script = dyn Fn(&str, usize) -> Result<GenerationResponse, RemoteError> + Send + Sync;

/// Client driven by a script of `(credential secret, call number) -> outcome`.
/// Every call yields once before answering so concurrent callers interleave.
pub struct ScriptedClient {
    script: Box<Script>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&str, usize) -> Result<GenerationResponse, RemoteError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Quota failure for every call made with one of `exhausted`, `body` otherwise.
    pub fn exhausted_keys(exhausted: &'static [&'static str], body: Value) -> Arc<Self> {
        let text = body.to_string();
        Self::new(move |key, _| {
            if exhausted.iter().any(|k| *k == key) {
                Err(RemoteError::new(
                    Some(429),
                    "RESOURCE_EXHAUSTED: Resource has been exhausted (e.g. check quota).",
                ))
            } else {
                Ok(GenerationResponse::text(text.clone()))
            }
        })
    }

    /// Secrets used for each call, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(
        &self,
        credential: &Credential,
        _call: &GenerationCall,
    ) -> Result<GenerationResponse, RemoteError> {
        let call_number = {
            let mut seen = self.seen.lock();
            seen.push(credential.expose().to_string());
            seen.len()
        };
        tokio::task::yield_now().await;
        (self.script)(credential.expose(), call_number)
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

pub fn executor(keys: &[&str], client: Arc<ScriptedClient>) -> RequestExecutor {
    let pool = Arc::new(CredentialPool::new(keys).unwrap());
    RequestExecutor::with_policy(pool, client, ExecutionPolicy::default())
}

pub fn call() -> GenerationCall {
    GenerationCall {
        prompt: "Analyze a bicycle".to_string(),
        system_instruction: None,
        response_schema: json!({ "type": "ARRAY" }),
    }
}

pub fn quota() -> RemoteError {
    RemoteError::quota("Too Many Requests")
}

pub fn part(id: &str) -> Value {
    json!({
        "id": id,
        "type": "box",
        "position": [0.0, 0.5, 0.0],
        "rotation": [0.0, 0.0, 0.0],
        "scale": [1.0, 1.0, 1.0],
        "color": "#64748b",
        "name": format!("Part {}", id)
    })
}

pub fn blueprint(count: usize) -> Value {
    Value::Array((0..count).map(|i| part(&format!("p{}", i))).collect())
}

pub fn analysis(domain: &str) -> Value {
    json!({
        "summary": "A sealed flywheel store is workable at small scale.",
        "riskScore": 0.42,
        "verdict": "PLAUSIBLE",
        "domain": domain,
        "scores": { "physics": 85, "engineering": 60, "economics": 45, "safety": 55 },
        "componentBreakdown": ["Rotor", "Magnetic bearings", "Vacuum housing"],
        "appliedPhysicsLaws": ["Conservation of angular momentum", "Hoop stress"],
        "keyCalculations": ["E = 1/2 I w^2 = 3.6 MJ", "sigma = rho r^2 w^2 = 410 MPa"],
        "manufacturability": { "rating": "Medium", "assessment": "Carbon rotor layup is specialized." },
        "violatedConstraints": ["None"],
        "failureModes": [
            {
                "scenario": "Rotor burst",
                "probability": "Low",
                "impact": "Catastrophic",
                "mitigation": "Containment ring"
            }
        ],
        "optimizations": ["Use a composite rim"],
        "reasoning": "Stress stays below the fibre limit with a 2x margin."
    })
}

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

const ISOLATED_VARS: [&str; 8] = [
    "HOME",
    "XDG_CONFIG_HOME",
    "AEGIS_ENV",
    "AEGIS_API_KEYS",
    "AEGIS_API_KEY",
    "GEMINI_API_KEY",
    "AEGIS_PROVIDER__MODEL",
    "AEGIS_EXECUTOR__ATTEMPTS_PER_CREDENTIAL",
];

/// Run `f` with HOME and XDG_CONFIG_HOME inside `test_dir`, every credential
/// variable cleared and `vars` applied. The original environment is restored.
pub fn with_isolated_env<F, R>(test_dir: &tempfile::TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|var| (*var, std::env::var(var).ok()))
        .collect();

    for var in ISOLATED_VARS {
        std::env::remove_var(var);
    }
    let home = test_dir.path().join("home");
    let config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (var, value) in saved {
        match value {
            Some(value) => std::env::set_var(var, value),
            None => std::env::remove_var(var),
        }
    }
    result
}
