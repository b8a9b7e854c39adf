// Report command - replay an event stream and write the JSON report

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::session::ReportSession;
use crate::utils::FileUtils;

pub fn handle_report(args: &ReportArgs, config: &Config) -> Result<()> {
    let output = config.resolve_output(args.output.as_deref());
    let strict = args.strict || config.general.strict;
    let pretty = config.report.pretty && !args.compact;

    let events = FileUtils::open_events(args.events_path())?;
    let sink = FileUtils::create_output(output.as_deref())?;

    let session = ReportSession::new(sink, pretty);
    let stats = session.replay(events, strict).with_context(|| {
        format!(
            "Failed to replay events from {}",
            args.events_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stdin".to_string())
        )
    })?;
    let (_, metrics) = session.finish()?;

    if stats.skipped > 0 {
        info!("{} undecodable event line(s) skipped", stats.skipped);
    }
    info!("{}", metrics.summary());
    if let Some(path) = output.filter(|p| !FileUtils::is_std_stream(Some(p.as_path()))) {
        info!("Report written to {}", path.display());
    }

    Ok(())
}
