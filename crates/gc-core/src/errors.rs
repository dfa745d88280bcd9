//! Cross-cutting error types for Gravicorr.
//!
//! Domain-specific errors (`DatabaseError`, `FormatError`, `PipelineError`)
//! live in their respective crates; errors converge into `anyhow` at the CLI.

use thiserror::Error;

/// Errors that can be raised by any Gravicorr crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("entity not found: {entity_type} {key}")]
    NotFound { entity_type: String, key: String },

    /// Data failed validation (format, spacing, constraints).
    #[error("validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
