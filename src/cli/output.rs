//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::AegisError;

/// Map domain/service errors to `kind: message` for CLI output.
pub fn map_error(e: &AegisError) -> String {
    format!("{}: {}", e.kind(), e)
}
