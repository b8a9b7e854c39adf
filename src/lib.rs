pub mod cli;
pub mod commands;
pub mod config;
pub mod events;
pub mod logging;
pub mod report;
pub mod session;
pub mod state;
pub mod utils;

pub use events::{Event, EventBroadcaster, EventListener, SourceLocation};
pub use report::{JsonFormatter, LineSink, build_features};
pub use session::ReportSession;
pub use state::EventDataCollector;
