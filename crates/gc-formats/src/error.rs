//! Format error types.
//!
//! A malformed file is a typed failure, never a silent empty result; callers
//! log it and move on to the next file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    /// The file does not exist or cannot be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not of the expected format (wrong extension or header
    /// signature).
    #[error("{path} is not a {expected} file")]
    WrongFormat { path: String, expected: String },

    /// The file matched the format but its content is unusable.
    #[error("malformed {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// A requested read window lies outside the record.
    #[error("read window [{start}, {stop}) outside record range")]
    OutOfRange { start: String, stop: String },
}

impl FormatError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn wrong_format(path: &std::path::Path, expected: &str) -> Self {
        Self::WrongFormat {
            path: path.display().to_string(),
            expected: expected.to_string(),
        }
    }
}
