// Report module - Cucumber JSON report built from collected run state

pub mod json;
pub mod model;

pub use json::{JsonFormatter, build_features};
pub use model::{
    ArgumentReport, ElementReport, EmbeddingReport, FeatureReport, MatchReport, ResultReport,
    RowReport, StepReport, TagReport,
};

use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Sink(#[from] io::Error),
}

/// Line-oriented destination for the report. The host decides where lines go.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl<W: Write> LineSink for W {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self, "{}", line)?;
        self.flush()
    }
}
