// Run index records - per-case and per-step execution results

use crate::events::{CaseIdentity, SourceLocation};
use crate::state::document::StepArgument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Step outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
    Pending,
    Ambiguous,
    Undefined,
}

impl StepStatus {
    pub const ALL: [StepStatus; 6] = [
        Self::Passed,
        Self::Failed,
        Self::Skipped,
        Self::Pending,
        Self::Ambiguous,
        Self::Undefined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Pending => "pending",
            Self::Ambiguous => "ambiguous",
            Self::Undefined => "undefined",
        }
    }

    /// Statuses that may carry an error detail
    pub fn is_failing(self) -> bool {
        matches!(self, Self::Failed | Self::Ambiguous)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result reported by a step-finished event. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    #[serde(rename = "duration", default)]
    pub duration_ms: u64,
    pub status: StepStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl StepResult {
    pub fn passed(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            status: StepStatus::Passed,
            error: None,
        }
    }

    pub fn failed(duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            duration_ms,
            status: StepStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn with_status(status: StepStatus, duration_ms: u64) -> Self {
        Self {
            duration_ms,
            status,
            error: None,
        }
    }
}

/// Overall case result from a case-finished event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    #[serde(rename = "duration", default)]
    pub duration_ms: u64,
    pub status: StepStatus,
}

/// Payload captured during a step, carried verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub data: String,
    pub media_type: String,
}

/// One entry of a prepared case's step shape. Hooks have no source location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedStep {
    #[serde(default)]
    pub source_location: Option<SourceLocation>,
    #[serde(default)]
    pub action_location: Option<SourceLocation>,
}

impl PreparedStep {
    pub fn is_hook(&self) -> bool {
        self.source_location.is_none()
    }
}

/// Concrete step of an accepted case, outline placeholders substituted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickleStep {
    pub location: SourceLocation,
    pub text: String,
    #[serde(default)]
    pub argument: Option<StepArgument>,
}

/// Concrete executable case as accepted for the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickle {
    pub name: Option<String>,
    pub steps: Vec<PickleStep>,
}

impl Pickle {
    pub fn step_at(&self, location: &SourceLocation) -> Option<&PickleStep> {
        self.steps.iter().find(|s| &s.location == location)
    }
}

/// Execution state of one step. `result == None` means not finished yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepRecord {
    pub result: Option<StepResult>,
    pub attachments: Vec<Attachment>,
}

/// Execution state of one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub identity: CaseIdentity,
    pub uri: String,
    pub pickle: Option<Pickle>,
    pub shape: Vec<PreparedStep>,
    pub steps: BTreeMap<usize, StepRecord>,
    pub result: Option<CaseResult>,
}

impl CaseRecord {
    pub fn new(identity: CaseIdentity) -> Self {
        let uri = identity.uri.clone();
        Self {
            identity,
            uri,
            pickle: None,
            shape: Vec::new(),
            steps: BTreeMap::new(),
            result: None,
        }
    }

    pub fn step(&self, index: usize) -> Option<&StepRecord> {
        self.steps.get(&index)
    }

    pub fn step_mut(&mut self, index: usize) -> &mut StepRecord {
        self.steps.entry(index).or_default()
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }
}
