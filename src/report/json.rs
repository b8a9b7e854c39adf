// JSON formatter - correlates collected state into the Cucumber JSON report

use super::model::{
    AFTER_HOOK_KEYWORD, ArgumentReport, BEFORE_HOOK_KEYWORD, ElementReport, EmbeddingReport,
    FeatureReport, MatchReport, ResultReport, SCENARIO_ELEMENT_TYPE, StepReport, TagReport,
};
use super::{LineSink, ReportError};
use crate::events::{Event, EventListener, SourceLocation};
use crate::state::{CaseRecord, EventDataCollector, FeatureNode};
use crate::utils::slugify;
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Writes the report when the run finishes.
///
/// Reads the collector it shares with the broadcaster; the collector must be
/// subscribed first so it has seen `run-finished` before the build.
pub struct JsonFormatter<S> {
    collector: Rc<RefCell<EventDataCollector>>,
    sink: S,
    pretty: bool,
    built: bool,
}

impl<S: LineSink> JsonFormatter<S> {
    pub fn new(collector: Rc<RefCell<EventDataCollector>>, sink: S) -> Self {
        Self {
            collector,
            sink,
            pretty: true,
            built: false,
        }
    }

    /// Two-space indented output (default) or a single compact line
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Build the report from the collected state and write it to the sink
    pub fn build_report(&mut self) -> Result<(), ReportError> {
        let features = build_features(&self.collector.borrow());
        let text = if self.pretty {
            serde_json::to_string_pretty(&features)?
        } else {
            serde_json::to_string(&features)?
        };

        self.sink.write_line(&text)?;
        self.built = true;

        info!(
            "report written: {} feature(s), {} scenario(s)",
            features.len(),
            features.iter().map(|f| f.elements.len()).sum::<usize>()
        );
        Ok(())
    }
}

impl<S: LineSink> EventListener for JsonFormatter<S> {
    fn on_event(&mut self, event: &Event) -> Result<()> {
        if let Event::RunFinished = event {
            if self.built {
                warn!("run-finished received again, report already written");
                return Ok(());
            }
            self.build_report()?;
        }
        Ok(())
    }
}

/// Correlate the collector's indexes into the ordered feature list.
///
/// Cases are taken in run order; each feature appears once, at the position
/// of its first case. Cases whose feature or scenario was never parsed are
/// dropped.
pub fn build_features(collector: &EventDataCollector) -> Vec<FeatureReport> {
    let mut features: Vec<FeatureReport> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for identity in collector.cases_in_run_order() {
        let Some(record) = collector.case_record(identity) else {
            continue;
        };
        let Some(feature) = collector.feature_for_uri(&record.uri) else {
            debug!("no feature parsed for {}, case {} dropped", record.uri, identity);
            continue;
        };
        let Some(element) = build_element(collector, feature, record) else {
            debug!("no scenario parsed at {}, case dropped", identity);
            continue;
        };

        let position = *positions.entry(record.uri.clone()).or_insert_with(|| {
            features.push(build_feature(collector, feature));
            features.len() - 1
        });
        features[position].elements.push(element);
    }

    features
}

fn build_feature(collector: &EventDataCollector, feature: &FeatureNode) -> FeatureReport {
    FeatureReport {
        description: feature.description.clone(),
        keyword: feature.keyword.clone(),
        name: feature.name.clone(),
        line: feature.location.line,
        id: slugify(&feature.name),
        tags: tag_reports(collector, &feature.location),
        uri: feature.location.uri.clone(),
        elements: Vec::new(),
    }
}

fn build_element(
    collector: &EventDataCollector,
    feature: &FeatureNode,
    record: &CaseRecord,
) -> Option<ElementReport> {
    let scenario = collector.documents().scenario_at(&record.identity)?;
    let name = record
        .pickle
        .as_ref()
        .and_then(|p| p.name.clone())
        .unwrap_or_else(|| scenario.name.clone());

    Some(ElementReport {
        description: scenario.description.clone(),
        id: format!("{};{}", slugify(&feature.name), slugify(&name)),
        keyword: scenario.keyword.clone(),
        line: record.identity.line,
        name,
        tags: tag_reports(collector, &record.identity),
        element_type: SCENARIO_ELEMENT_TYPE,
        steps: build_steps(collector, record),
    })
}

fn tag_reports(collector: &EventDataCollector, location: &SourceLocation) -> Vec<TagReport> {
    collector.tags_for(location).iter().map(TagReport::from).collect()
}

/// One step per entry of the prepared shape, in shape order
fn build_steps(collector: &EventDataCollector, record: &CaseRecord) -> Vec<StepReport> {
    let mut before_first_step = true;

    record
        .shape
        .iter()
        .enumerate()
        .map(|(index, prepared)| {
            let mut step = match &prepared.source_location {
                None => StepReport::hook(if before_first_step {
                    BEFORE_HOOK_KEYWORD
                } else {
                    AFTER_HOOK_KEYWORD
                }),
                Some(location) => {
                    before_first_step = false;
                    document_step(collector, record, location)
                }
            };

            step.step_match = prepared.action_location.as_ref().map(|l| MatchReport {
                location: l.to_string(),
            });

            if let Some(step_record) = record.step(index) {
                step.result = step_record.result.as_ref().map(ResultReport::from);
                if !step_record.attachments.is_empty() {
                    step.embeddings = Some(
                        step_record
                            .attachments
                            .iter()
                            .map(EmbeddingReport::from)
                            .collect(),
                    );
                }
            }

            step
        })
        .collect()
}

/// Keyword from the document step; text and argument from the pickle step
/// when present, so outline rows get their substituted values.
fn document_step(
    collector: &EventDataCollector,
    record: &CaseRecord,
    location: &SourceLocation,
) -> StepReport {
    let node = collector.documents().step_at(location);
    let pickle_step = record.pickle.as_ref().and_then(|p| p.step_at(location));

    let keyword = node.map(|n| n.keyword.clone()).unwrap_or_default();
    let name = pickle_step
        .map(|p| p.text.clone())
        .or_else(|| node.map(|n| n.text.clone()))
        .unwrap_or_default();
    let argument = pickle_step
        .and_then(|p| p.argument.as_ref())
        .or_else(|| node.and_then(|n| n.argument.as_ref()));

    StepReport::document(
        keyword,
        location.line,
        name,
        argument.into_iter().map(ArgumentReport::from).collect(),
    )
}
