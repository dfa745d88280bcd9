//! Pipeline error types.

use thiserror::Error;

/// Errors from the processing pipeline.
///
/// Most of these stay local to one file or pair: the surrounding batch loop
/// logs them and moves on. Only configuration problems abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Database(#[from] gc_db::error::DatabaseError),

    #[error(transparent)]
    Format(#[from] gc_formats::FormatError),

    #[error(transparent)]
    Config(#[from] gc_config::ConfigError),

    /// A numeric computation failed for one minute or window.
    #[error("computation failed: {0}")]
    Compute(String),

    /// Export file or directory I/O failed.
    #[error("export failed at {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A background task was cancelled or panicked.
    #[error("worker task failed: {0}")]
    Join(String),
}
