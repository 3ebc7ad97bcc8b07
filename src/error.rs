//! Error types
//!
//! Every failure the filter can report before or during a run.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors raised while loading the configuration or running a stage
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("The ini file could not be read: {0:?} does not exist")]
    ConfigNotFound(PathBuf),

    #[error("The following parameters are missing from the ini file: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Parameter '{key}' is required when {reason}")]
    MissingDependentKey { key: String, reason: String },

    #[error("Failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Command `{command}` failed ({status})")]
    ToolFailed { command: String, status: ExitStatus },

    #[error("Command `{command}` finished but did not produce {path:?}")]
    MissingOutput { command: String, path: PathBuf },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl FilterError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
