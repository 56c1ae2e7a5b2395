//! Aegis: Physics-Grounded Idea Analysis
//!
//! Turns a free-text engineering idea into a schema-checked feasibility analysis
//! or a primitive-based CAD blueprint, using a remote generative model reached
//! through a rotating pool of API credentials.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod generation;
pub mod logging;
pub mod provider;
pub mod report;
pub mod schema;
pub mod types;

pub use credentials::{Credential, CredentialPool, Rotation};
pub use error::{AegisError, ValidationError};
pub use executor::{ExecutionPolicy, RequestExecutor};
pub use generation::GenerationService;
pub use provider::{GeminiClient, GenerationCall, GenerationClient, GenerationResponse, RemoteError};
pub use schema::SchemaContract;
