//! Error types for splitr.
//!
//! Only user input (time text, category forms) and the persistence layers
//! produce errors. Timer transitions attempted from the wrong state are
//! no-ops, not errors.

use std::path::PathBuf;

/// Time text that does not match `mm:ss.cc`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time `{input}`: use mm:ss.cc")]
pub struct FormatError {
    pub input: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Every problem found while validating a category, reported together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not submit:\n{}", .problems.join("\n"))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed categories file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode categories: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Attempt history error: {0}")]
    History(#[from] csv::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T, E = SplitError> = std::result::Result<T, E>;
