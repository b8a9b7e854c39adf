// Report document model - Cucumber JSON field set and presence rules

use crate::state::{Attachment, StepArgument, StepResult, StepStatus, Tag};
use serde::Serialize;

/// Literal `type` of scenario elements
pub const SCENARIO_ELEMENT_TYPE: &str = "scenario";

/// Fixed keywords of synthetic hook steps
pub const BEFORE_HOOK_KEYWORD: &str = "Before";
pub const AFTER_HOOK_KEYWORD: &str = "After";

/// Milliseconds to the nanoseconds the report format uses
pub const NANOS_PER_MILLI: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureReport {
    pub description: String,
    pub keyword: String,
    pub name: String,
    pub line: u32,
    pub id: String,
    pub tags: Vec<TagReport>,
    pub uri: String,
    pub elements: Vec<ElementReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementReport {
    pub description: String,
    pub id: String,
    pub keyword: String,
    pub line: u32,
    pub name: String,
    pub tags: Vec<TagReport>,
    #[serde(rename = "type")]
    pub element_type: &'static str,
    pub steps: Vec<StepReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagReport {
    pub name: String,
    pub line: u32,
}

impl From<&Tag> for TagReport {
    fn from(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            line: tag.location.line,
        }
    }
}

/// One step. Hook steps carry only `keyword`, `hidden` and execution data;
/// document steps never carry `hidden`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<ArgumentReport>>,
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub step_match: Option<MatchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<EmbeddingReport>>,
}

impl StepReport {
    pub fn hook(keyword: &str) -> Self {
        Self {
            arguments: None,
            keyword: keyword.to_string(),
            line: None,
            name: None,
            hidden: Some(true),
            step_match: None,
            result: None,
            embeddings: None,
        }
    }

    pub fn document(
        keyword: String,
        line: u32,
        name: String,
        arguments: Vec<ArgumentReport>,
    ) -> Self {
        Self {
            arguments: Some(arguments),
            keyword,
            line: Some(line),
            name: Some(name),
            hidden: None,
            step_match: None,
            result: None,
            embeddings: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgumentReport {
    DocString { content: String, line: u32 },
    DataTable { rows: Vec<RowReport> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub cells: Vec<String>,
}

impl From<&StepArgument> for ArgumentReport {
    fn from(argument: &StepArgument) -> Self {
        match argument {
            StepArgument::DocString {
                location, content, ..
            } => Self::DocString {
                content: content.clone(),
                line: location.line,
            },
            StepArgument::DataTable { rows, .. } => Self::DataTable {
                rows: rows
                    .iter()
                    .map(|cells| RowReport {
                        cells: cells.clone(),
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultReport {
    pub status: StepStatus,
    /// Nanoseconds
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&StepResult> for ResultReport {
    fn from(result: &StepResult) -> Self {
        Self {
            status: result.status,
            duration: result.duration_ms.saturating_mul(NANOS_PER_MILLI),
            error_message: result
                .error
                .clone()
                .filter(|_| result.status.is_failing()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingReport {
    pub data: String,
    pub mime_type: String,
}

impl From<&Attachment> for EmbeddingReport {
    fn from(attachment: &Attachment) -> Self {
        Self {
            data: attachment.data.clone(),
            mime_type: attachment.media_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SourceLocation;
    use serde_json::json;

    #[test]
    fn test_duration_is_nanoseconds() {
        let report = ResultReport::from(&StepResult::passed(1));
        assert_eq!(report.duration, 1_000_000);

        let report = ResultReport::from(&StepResult::passed(37));
        assert_eq!(report.duration, 37_000_000);
    }

    #[test]
    fn test_error_message_only_for_failing_status() {
        let failed = ResultReport::from(&StepResult::failed(1, "expected 1, got 2"));
        assert_eq!(failed.error_message.as_deref(), Some("expected 1, got 2"));

        let mut skipped = StepResult::with_status(StepStatus::Skipped, 0);
        skipped.error = Some("ignored".to_string());
        assert!(ResultReport::from(&skipped).error_message.is_none());

        let value = serde_json::to_value(ResultReport::from(&StepResult::passed(2))).unwrap();
        assert_eq!(value, json!({"status": "passed", "duration": 2_000_000}));
    }

    #[test]
    fn test_hook_step_shape() {
        let value = serde_json::to_value(StepReport::hook(BEFORE_HOOK_KEYWORD)).unwrap();
        assert_eq!(value, json!({"keyword": "Before", "hidden": true}));
    }

    #[test]
    fn test_document_step_always_has_arguments() {
        let step = StepReport::document("Given ".to_string(), 4, "a step".to_string(), Vec::new());
        let value = serde_json::to_value(step).unwrap();
        assert_eq!(
            value,
            json!({"arguments": [], "keyword": "Given ", "line": 4, "name": "a step"})
        );
    }

    #[test]
    fn test_arguments_serialize_by_shape() {
        let doc = ArgumentReport::from(&StepArgument::DocString {
            location: SourceLocation::new("a.feature", 5),
            content: "text".to_string(),
            content_type: Some("markdown".to_string()),
        });
        assert_eq!(
            serde_json::to_value(doc).unwrap(),
            json!({"content": "text", "line": 5})
        );

        let table = ArgumentReport::from(&StepArgument::DataTable {
            location: SourceLocation::new("a.feature", 5),
            rows: vec![vec!["a".to_string(), "b".to_string()]],
        });
        assert_eq!(
            serde_json::to_value(table).unwrap(),
            json!({"rows": [{"cells": ["a", "b"]}]})
        );
    }
}
