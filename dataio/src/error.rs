//! Error taxonomy for layout resolution and artifact loading.
//!
//! Every fallible library operation returns [`DataioError`]. Nothing in this
//! crate retries or substitutes defaults for missing data; errors propagate to
//! the immediate caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::keys::Group;

/// Errors produced by the data layout and loaders.
#[derive(Debug, Error)]
pub enum DataioError {
    /// No directory from `start` upward carries a root marker.
    #[error(
        "could not detect project root from {}: expected requirements.txt or .git in it or a parent directory",
        .start.display()
    )]
    RootNotFound { start: PathBuf },

    #[error("invalid population {value:?}: must be one of CEU, YRI")]
    InvalidPopulation { value: String },

    #[error("invalid method {value:?}: must be one of method1, method2, method3")]
    InvalidMethod { value: String },

    #[error("invalid group {value:?}: must be one of case, control, test")]
    InvalidGroup { value: String },

    #[error("invalid epsilon {value}: must be a finite number > 0")]
    InvalidEpsilon { value: f64 },

    /// Archive missing, not a zip container, or holding an undecodable member.
    #[error("failed to read archive {}: {message}", .path.display())]
    ArchiveRead { path: PathBuf, message: String },

    #[error("failed to read cohort file {}: {message}", .path.display())]
    CohortRead { path: PathBuf, message: String },

    #[error("cohort document has no '{group}' group")]
    MissingGroup { group: Group },

    #[error(
        "cohorts['{group}'] is missing '{field}'. Regenerate the cohort split with indices saved."
    )]
    MissingIndices { group: Group, field: &'static str },

    #[error("cohorts['{group}'] has invalid indices: {message}")]
    InvalidIndices { group: Group, message: String },

    #[error("cohorts['{group}'] has invalid sample ids: {message}")]
    InvalidSampleIds { group: Group, message: String },

    #[error("field '{field}' has length {actual}, expected {expected}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("index {index} is out of bounds for {len} rows")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("one or more required files are missing: {}", format_paths(.missing))]
    MissingRequiredFiles { missing: Vec<PathBuf> },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, DataioError>;

impl DataioError {
    pub fn archive(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ArchiveRead {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn cohort(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CohortRead {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
