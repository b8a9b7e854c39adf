// Summary command - print run counters for an event stream

use anyhow::Result;
use std::io;

use crate::cli::SummaryArgs;
use crate::config::Config;
use crate::session::ReportSession;
use crate::utils::FileUtils;

pub fn handle_summary(args: &SummaryArgs, config: &Config) -> Result<()> {
    let events = FileUtils::open_events(args.events.as_deref())?;

    // The report itself is discarded; only the collected state matters here
    let session = ReportSession::new(io::sink(), false);
    session.replay(events, args.strict || config.general.strict)?;
    let (_, metrics) = session.finish()?;

    if args.is_json() {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{}", metrics.summary());
    }

    Ok(())
}
