// Report session - one broadcaster, collector and formatter per run

use crate::events::{Event, EventBroadcaster, EventStreamReader};
use crate::report::{JsonFormatter, LineSink};
use crate::state::{EventDataCollector, RunMetrics};
use anyhow::{Result, anyhow};
use std::cell::{Ref, RefCell};
use std::io::BufRead;
use std::rc::Rc;
use tracing::{debug, warn};

/// Counters from replaying a recorded stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub skipped: usize,
}

/// Wires a fresh collector and formatter to a fresh broadcaster, collector first.
/// State never outlives the session.
pub struct ReportSession<S> {
    broadcaster: EventBroadcaster,
    collector: Rc<RefCell<EventDataCollector>>,
    formatter: Rc<RefCell<JsonFormatter<S>>>,
}

impl<S: LineSink + 'static> ReportSession<S> {
    pub fn new(sink: S, pretty: bool) -> Self {
        let collector = Rc::new(RefCell::new(EventDataCollector::new()));
        let formatter = Rc::new(RefCell::new(
            JsonFormatter::new(collector.clone(), sink).with_pretty(pretty),
        ));

        let mut broadcaster = EventBroadcaster::new();
        broadcaster.subscribe(collector.clone());
        broadcaster.subscribe(formatter.clone());

        Self {
            broadcaster,
            collector,
            formatter,
        }
    }

    pub fn emit(&self, event: &Event) -> Result<()> {
        self.broadcaster.emit(event)
    }

    /// Feed an NDJSON stream through the broadcaster. Undecodable lines are
    /// skipped with a warning unless `strict`; read failures always abort.
    pub fn replay<R: BufRead>(&self, reader: R, strict: bool) -> Result<ReplayStats> {
        let mut stats = ReplayStats::default();

        for item in EventStreamReader::new(reader) {
            match item {
                Ok(event) => {
                    self.emit(&event)?;
                    stats.events += 1;
                }
                Err(err) if err.is_recoverable() && !strict => {
                    let cause = std::error::Error::source(&err)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    warn!("{}: {}, skipped", err, cause);
                    stats.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        debug!("replayed {} events, skipped {}", stats.events, stats.skipped);
        Ok(stats)
    }

    pub fn collector(&self) -> Ref<'_, EventDataCollector> {
        self.collector.borrow()
    }

    pub fn is_reported(&self) -> bool {
        self.formatter.borrow().is_built()
    }

    /// Make sure the report was written, then hand back the sink and run metrics.
    /// A stream that ended without `run-finished` gets one synthesized.
    pub fn finish(self) -> Result<(S, RunMetrics)> {
        if !self.is_reported() {
            debug!("event stream ended without run-finished");
            self.emit(&Event::RunFinished)?;
        }

        let Self {
            broadcaster,
            collector,
            formatter,
        } = self;
        drop(broadcaster);

        let metrics = collector.borrow().metrics();
        let formatter = Rc::try_unwrap(formatter)
            .map_err(|_| anyhow!("formatter is still shared after the run"))?
            .into_inner();

        Ok((formatter.into_sink(), metrics))
    }
}
