//! Crate-wide error type.
//!
//! Only failures that originate outside the simulator (files, configuration,
//! malformed task graphs) are represented here. Contract violations inside
//! the inference kernel (mismatched vector lengths) panic instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Errors surfaced by model loading, configuration and run setup.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The relation model (or configuration) file does not exist.
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Any other I/O failure while reading or writing a file.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A relation model field is not a number.
    #[error("line {line}, column {column}: '{value}' is not numeric")]
    Parse {
        line: usize,
        column: usize,
        value: String,
    },

    /// A relation model row has a different width than the first row.
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedModel {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The relation model has no rows.
    #[error("relation model is empty")]
    EmptyModel,

    /// Controller universes and relation model dimensions disagree.
    #[error("{what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// No calibration profile for the requested benchmark.
    #[error("unknown benchmark '{0}'")]
    UnknownBenchmark(String),

    /// Unrecognized allocation or dispatching policy tag.
    #[error("unknown policy tag '{0}'")]
    UnknownPolicy(String),

    /// A run was requested with zero simulated threads.
    #[error("thread count must be at least 1")]
    NoThreads,

    /// A task references a dependency id that is not in the task list.
    #[error("task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: u32, dependency: u32 },

    /// The task graph failed validation.
    #[error("invalid task graph: {}", summarize(.0))]
    InvalidGraph(Vec<ValidationError>),

    /// Calibration table could not be (de)serialized.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl MappingError {
    /// Maps an I/O error to `FileNotFound` or `Io` depending on its kind.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            MappingError::FileNotFound { path }
        } else {
            MappingError::Io { path, source }
        }
    }
}
