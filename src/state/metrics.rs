// Run metrics - counters derived from the run index

use crate::state::result::{CaseRecord, StepStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Run metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunMetrics {
    pub cases_seen: usize,
    pub cases_finished: usize,
    pub case_statuses: BTreeMap<StepStatus, usize>,
    pub step_statuses: BTreeMap<StepStatus, usize>,
    pub attachments: usize,
    pub total_duration_ms: u64,
}

impl RunMetrics {
    /// Tally every case and step record. Duplicated events were already
    /// collapsed by the collector, so each record counts once.
    pub fn collect<'a>(records: impl IntoIterator<Item = &'a CaseRecord>) -> Self {
        let mut metrics = Self::default();

        for record in records {
            metrics.cases_seen += 1;
            if let Some(result) = &record.result {
                metrics.record_case(result.status, result.duration_ms);
            }
            for step in record.steps.values() {
                if let Some(result) = &step.result {
                    metrics.record_step(result.status);
                }
                metrics.attachments += step.attachments.len();
            }
        }

        metrics
    }

    pub fn record_case(&mut self, status: StepStatus, duration_ms: u64) {
        self.cases_finished += 1;
        *self.case_statuses.entry(status).or_default() += 1;
        self.total_duration_ms = self.total_duration_ms.saturating_add(duration_ms);
    }

    pub fn record_step(&mut self, status: StepStatus) {
        *self.step_statuses.entry(status).or_default() += 1;
    }

    pub fn cases_with(&self, status: StepStatus) -> usize {
        self.case_statuses.get(&status).copied().unwrap_or(0)
    }

    pub fn steps_with(&self, status: StepStatus) -> usize {
        self.step_statuses.get(&status).copied().unwrap_or(0)
    }

    pub fn steps_finished(&self) -> usize {
        self.step_statuses.values().sum()
    }

    /// One-line summary, e.g. `2 scenarios (1 failed, 1 passed), 7 steps (...)`
    pub fn summary(&self) -> String {
        format!(
            "{} scenarios{}, {} steps{}, {} attachments in {}ms",
            self.cases_finished,
            Self::breakdown(&self.case_statuses),
            self.steps_finished(),
            Self::breakdown(&self.step_statuses),
            self.attachments,
            self.total_duration_ms
        )
    }

    fn breakdown(counts: &BTreeMap<StepStatus, usize>) -> String {
        // Failures first so they stand out
        let parts: Vec<String> = [
            StepStatus::Failed,
            StepStatus::Ambiguous,
            StepStatus::Undefined,
            StepStatus::Pending,
            StepStatus::Skipped,
            StepStatus::Passed,
        ]
        .into_iter()
        .filter_map(|status| {
            counts
                .get(&status)
                .filter(|n| **n > 0)
                .map(|n| format!("{} {}", n, status))
        })
        .collect();

        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}
