// Logging - stderr diagnostics with an emoji level prefix

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "cukereport=debug,warn"
    } else {
        "cukereport=warn,error"
    }
}

/// Install the global subscriber. Logs go to stderr so the report can use stdout.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .event_format(CustomFormatter { with_target: verbose })
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `ℹ️  INFO [12:00:00]: message`, with the event target appended in verbose mode
pub struct CustomFormatter {
    pub with_target: bool,
}

fn level_label(level: &Level) -> (&'static str, &'static str) {
    match *level {
        Level::TRACE => ("🔬", "TRACE"),
        Level::DEBUG => ("🐛", "DEBUG"),
        Level::INFO => ("ℹ️ ", "INFO"),
        Level::WARN => ("⚠️ ", "WARN"),
        Level::ERROR => ("❌", "ERROR"),
    }
}

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let (emoji, label) = level_label(metadata.level());
        let timestamp = Local::now().format("%H:%M:%S");

        write!(writer, "{} {} [{}]", emoji, label, timestamp)?;
        if self.with_target {
            write!(writer, " {}", metadata.target())?;
        }
        write!(writer, ": ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
