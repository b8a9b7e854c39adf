// Events module - lifecycle events emitted while a suite runs
// Structural parse events describe documents; run events describe execution.

pub mod broadcaster;
pub mod location;
pub mod stream;

pub use broadcaster::{EventBroadcaster, EventListener, SharedListener};
pub use location::{CaseIdentity, SourceLocation};
pub use stream::{EventStreamError, EventStreamReader};

use crate::state::document::{
    BackgroundNode, FeatureNode, RuleNode, ScenarioNode, StepArgument, StepNode, Tag,
};
use crate::state::result::{CaseResult, PickleStep, PreparedStep, StepResult};
use serde::{Deserialize, Serialize};

/// A lifecycle event.
///
/// Serialized with a kebab-case `type` tag and camelCase fields, so a
/// recorded stream reads `{"type":"step-finished","identity":{...},"index":0,...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Event {
    FeatureParsed(FeatureNode),
    RuleParsed(RuleNode),
    BackgroundParsed(BackgroundNode),
    /// Plain scenario, or one concrete outline instance per example row
    ScenarioParsed(ScenarioNode),
    StepParsed(StepNode),
    TagParsed {
        owner: SourceLocation,
        tag: Tag,
    },
    DocStringParsed {
        step: SourceLocation,
        location: SourceLocation,
        content: String,
        #[serde(default)]
        content_type: Option<String>,
    },
    DataTableParsed {
        step: SourceLocation,
        location: SourceLocation,
        rows: Vec<Vec<String>>,
    },
    CaseAccepted {
        identity: CaseIdentity,
        uri: String,
        /// Resolved case name, if the emitter supplies the pickle
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        steps: Vec<PickleStep>,
    },
    CasePrepared {
        identity: CaseIdentity,
        steps: Vec<PreparedStep>,
    },
    StepFinished {
        identity: CaseIdentity,
        index: usize,
        result: StepResult,
    },
    AttachmentCaptured {
        identity: CaseIdentity,
        index: usize,
        data: String,
        media_type: String,
    },
    CaseFinished {
        identity: CaseIdentity,
        result: CaseResult,
    },
    RunFinished,
}

impl Event {
    /// Event name as it appears in the `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FeatureParsed(_) => "feature-parsed",
            Self::RuleParsed(_) => "rule-parsed",
            Self::BackgroundParsed(_) => "background-parsed",
            Self::ScenarioParsed(_) => "scenario-parsed",
            Self::StepParsed(_) => "step-parsed",
            Self::TagParsed { .. } => "tag-parsed",
            Self::DocStringParsed { .. } => "doc-string-parsed",
            Self::DataTableParsed { .. } => "data-table-parsed",
            Self::CaseAccepted { .. } => "case-accepted",
            Self::CasePrepared { .. } => "case-prepared",
            Self::StepFinished { .. } => "step-finished",
            Self::AttachmentCaptured { .. } => "attachment-captured",
            Self::CaseFinished { .. } => "case-finished",
            Self::RunFinished => "run-finished",
        }
    }

    /// Returns the argument carried by a doc-string or data-table event
    pub fn argument(&self) -> Option<(&SourceLocation, StepArgument)> {
        match self {
            Self::DocStringParsed {
                step,
                location,
                content,
                content_type,
            } => Some((
                step,
                StepArgument::DocString {
                    location: location.clone(),
                    content: content.clone(),
                    content_type: content_type.clone(),
                },
            )),
            Self::DataTableParsed {
                step,
                location,
                rows,
            } => Some((
                step,
                StepArgument::DataTable {
                    location: location.clone(),
                    rows: rows.clone(),
                },
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::result::StepStatus;

    #[test]
    fn test_run_finished_tag_only() {
        let event: Event = serde_json::from_str(r#"{"type":"run-finished"}"#).unwrap();
        assert_eq!(event, Event::RunFinished);
        assert_eq!(event.kind(), "run-finished");
    }

    #[test]
    fn test_step_finished_from_json() {
        let event: Event = serde_json::from_str(
            r#"{"type":"step-finished","identity":{"uri":"a.feature","line":3},"index":1,
                "result":{"duration":1,"status":"passed"}}"#,
        )
        .unwrap();

        match event {
            Event::StepFinished {
                identity,
                index,
                result,
            } => {
                assert_eq!(identity, SourceLocation::new("a.feature", 3));
                assert_eq!(index, 1);
                assert_eq!(result.status, StepStatus::Passed);
                assert_eq!(result.duration_ms, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_case_prepared_hook_steps_have_no_location() {
        let event: Event = serde_json::from_str(
            r#"{"type":"case-prepared","identity":{"uri":"a.feature","line":3},
                "steps":[{"actionLocation":{"uri":"hooks.rs","line":4}},
                         {"sourceLocation":{"uri":"a.feature","line":4}}]}"#,
        )
        .unwrap();

        let Event::CasePrepared { steps, .. } = event else {
            panic!("expected case-prepared");
        };
        assert!(steps[0].is_hook());
        assert!(!steps[1].is_hook());
        assert_eq!(steps[0].action_location, Some(SourceLocation::new("hooks.rs", 4)));
    }

    #[test]
    fn test_attachment_media_type_is_camel_case() {
        let event = Event::AttachmentCaptured {
            identity: SourceLocation::new("a.feature", 3),
            index: 0,
            data: "hi".to_string(),
            media_type: "text/plain".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "attachment-captured");
        assert_eq!(value["mediaType"], "text/plain");
    }

    #[test]
    fn test_data_table_event_argument() {
        let event = Event::DataTableParsed {
            step: SourceLocation::new("a.feature", 4),
            location: SourceLocation::new("a.feature", 5),
            rows: vec![vec!["a".to_string(), "b".to_string()]],
        };
        let (step, argument) = event.argument().unwrap();
        assert_eq!(step.line, 4);
        assert!(matches!(argument, StepArgument::DataTable { ref rows, .. } if rows.len() == 1));
    }
}
