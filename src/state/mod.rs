// State module - event data collector
// Accumulates the document index and the run index for one run; produces no output

pub mod document;
pub mod metrics;
pub mod result;

pub use document::{
    DocumentIndex, DocumentNode, FeatureNode, ScenarioNode, StepArgument, StepNode, Tag,
};
pub use metrics::RunMetrics;
pub use result::{
    Attachment, CaseRecord, CaseResult, Pickle, PickleStep, PreparedStep, StepRecord, StepResult,
    StepStatus,
};

use crate::events::{CaseIdentity, Event, EventListener, SourceLocation};
use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Collects parse-time and run-time events into two value-keyed indexes.
///
/// Never rejects an event: duplicates overwrite (last write wins) and events
/// for unknown cases create the case record.
#[derive(Debug, Default)]
pub struct EventDataCollector {
    documents: DocumentIndex,
    cases: HashMap<CaseIdentity, CaseRecord>,
    /// Identities in the order their record was first created
    seen_order: Vec<CaseIdentity>,
    /// Identities in the order of their first case-finished event
    finished_order: Vec<CaseIdentity>,
}

impl EventDataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event to the indexes
    pub fn handle(&mut self, event: &Event) {
        trace!(kind = event.kind(), "collecting event");

        match event {
            Event::FeatureParsed(node) => {
                self.documents.insert(DocumentNode::Feature(node.clone()))
            }
            Event::RuleParsed(node) => self.documents.insert(DocumentNode::Rule(node.clone())),
            Event::BackgroundParsed(node) => {
                self.documents.insert(DocumentNode::Background(node.clone()))
            }
            Event::ScenarioParsed(node) => {
                self.documents.insert(DocumentNode::Scenario(node.clone()))
            }
            Event::StepParsed(node) => self.documents.insert(DocumentNode::Step(node.clone())),
            Event::TagParsed { owner, tag } => self.documents.add_tag(owner.clone(), tag.clone()),
            Event::DocStringParsed { .. } | Event::DataTableParsed { .. } => {
                if let Some((step, argument)) = event.argument() {
                    if !self.documents.attach_argument(step, argument) {
                        debug!("argument for unknown step {}, ignored", step);
                    }
                }
            }
            Event::CaseAccepted {
                identity,
                uri,
                name,
                steps,
            } => {
                let record = self.record_mut(identity);
                record.uri = uri.clone();
                if name.is_some() || !steps.is_empty() {
                    record.pickle = Some(Pickle {
                        name: name.clone(),
                        steps: steps.clone(),
                    });
                }
            }
            Event::CasePrepared { identity, steps } => {
                let record = self.record_mut(identity);
                record.shape = steps.clone();
                if let Some(index) = record.steps.keys().find(|i| **i >= steps.len()) {
                    debug!(
                        "case {} has a record for step {} outside its {}-step shape",
                        identity,
                        index,
                        steps.len()
                    );
                }
            }
            Event::StepFinished {
                identity,
                index,
                result,
            } => {
                let record = self.record_mut(identity);
                Self::check_index(record, *index);
                record.step_mut(*index).result = Some(result.clone());
            }
            Event::AttachmentCaptured {
                identity,
                index,
                data,
                media_type,
            } => {
                let record = self.record_mut(identity);
                Self::check_index(record, *index);
                record.step_mut(*index).attachments.push(Attachment {
                    data: data.clone(),
                    media_type: media_type.clone(),
                });
            }
            Event::CaseFinished { identity, result } => {
                let record = self.record_mut(identity);
                let first = !record.is_finished();
                record.result = Some(result.clone());
                if first {
                    self.finished_order.push(identity.clone());
                }
            }
            Event::RunFinished => {
                debug!(
                    "run finished with {} cases, {} document nodes",
                    self.cases.len(),
                    self.documents.len()
                );
            }
        }
    }

    fn record_mut(&mut self, identity: &CaseIdentity) -> &mut CaseRecord {
        if !self.cases.contains_key(identity) {
            self.seen_order.push(identity.clone());
        }
        self.cases
            .entry(identity.clone())
            .or_insert_with(|| CaseRecord::new(identity.clone()))
    }

    fn check_index(record: &CaseRecord, index: usize) {
        // Attachments and hook results may precede preparation in some orderings
        if !record.shape.is_empty() && index >= record.shape.len() {
            debug!(
                "step {} of case {} is outside its {}-step shape",
                index,
                record.identity,
                record.shape.len()
            );
        }
    }

    pub fn documents(&self) -> &DocumentIndex {
        &self.documents
    }

    pub fn document_node_at(&self, location: &SourceLocation) -> Option<&DocumentNode> {
        self.documents.node_at(location)
    }

    pub fn feature_for_uri(&self, uri: &str) -> Option<&FeatureNode> {
        self.documents.feature_for_uri(uri)
    }

    /// Effective tags: feature tags, then rule tags, then the node's own
    pub fn tags_for(&self, location: &SourceLocation) -> Vec<Tag> {
        self.documents.tags_for(location)
    }

    pub fn case_record(&self, identity: &CaseIdentity) -> Option<&CaseRecord> {
        self.cases.get(identity)
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Finished cases in finish order, then unfinished cases in first-seen order
    pub fn cases_in_run_order(&self) -> Vec<&CaseIdentity> {
        let unfinished = self
            .seen_order
            .iter()
            .filter(|id| self.cases.get(*id).is_some_and(|r| !r.is_finished()));

        self.finished_order.iter().chain(unfinished).collect()
    }

    pub fn metrics(&self) -> RunMetrics {
        RunMetrics::collect(self.seen_order.iter().filter_map(|id| self.cases.get(id)))
    }
}

impl EventListener for EventDataCollector {
    fn on_event(&mut self, event: &Event) -> Result<()> {
        self.handle(event);
        Ok(())
    }
}
