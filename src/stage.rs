//! Filter stages and their completion state

use std::fmt;
use std::path::{Path, PathBuf};

/// The three filter stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Quality,
    Blacklist,
    MappingQuality,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Blacklist => "blacklist",
            Self::MappingQuality => "MQ",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where a stage stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// Output missing (or overwrite requested), stage must run
    Pending,
    /// Output already present and overwrite not requested
    AlreadyDone,
    /// Stage switched off in the configuration
    NotConfigured,
    /// Stage ran in this invocation
    Executed,
}

impl StageState {
    /// Decide from the stage's completion marker whether it has to run
    pub fn check(output: &Path, overwrite: bool) -> Self {
        if overwrite || !output.exists() {
            Self::Pending
        } else {
            Self::AlreadyDone
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AlreadyDone => "already done",
            Self::NotConfigured => "not configured",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub state: StageState,
    /// File the next stage reads; `None` if the stage produced nothing
    pub output: Option<PathBuf>,
}

impl StageReport {
    pub fn new(stage: Stage, state: StageState, output: Option<PathBuf>) -> Self {
        Self {
            stage,
            state,
            output,
        }
    }
}
