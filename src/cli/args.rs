// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Build a Cucumber JSON report from a recorded test-run event stream
#[derive(Parser, Debug)]
#[command(name = "cukereport")]
#[command(author = "cukereport contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate BDD test-run events into a Cucumber JSON report", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Flattened so `cukereport events.ndjson` works without naming the subcommand
    #[command(flatten)]
    pub report_args: ReportArgs,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion script (bash, zsh, fish, elvish, powershell)
    #[arg(
        long,
        value_name = "SHELL_TYPE",
        value_parser = ["bash", "zsh", "fish", "elvish", "powershell"]
    )]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the JSON report (default)
    Report(ReportArgs),

    /// Print run counters without writing the report
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// NDJSON event stream to read; stdin when omitted or `-`
    #[arg(required = false)]
    pub events: Option<PathBuf>,

    /// Output file for the report; stdout when omitted or `-`
    #[arg(short = 'o', long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Write the report on a single line
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Fail on the first undecodable event instead of skipping it
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// NDJSON event stream to read; stdin when omitted or `-`
    #[arg(required = false)]
    pub events: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Fail on the first undecodable event instead of skipping it
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

impl Cli {
    /// Helper to get effective ReportArgs
    pub fn get_report_args(&self) -> &ReportArgs {
        match &self.command {
            Some(Commands::Report(args)) => args,
            _ => &self.report_args,
        }
    }
}

impl ReportArgs {
    pub fn events_path(&self) -> Option<&Path> {
        self.events.as_deref()
    }
}

impl SummaryArgs {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_report_command() {
        let cli = Cli::parse_from(["cukereport", "events.ndjson", "-o", "out.json"]);
        assert!(cli.command.is_none());

        let args = cli.get_report_args();
        assert_eq!(args.events_path(), Some(Path::new("events.ndjson")));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(!args.compact);
    }

    #[test]
    fn test_explicit_report_command() {
        let cli = Cli::parse_from(["cukereport", "report", "--compact", "--strict"]);
        let args = cli.get_report_args();
        assert!(args.compact);
        assert!(args.strict);
        assert!(args.events.is_none());
    }

    #[test]
    fn test_summary_format() {
        let cli = Cli::parse_from(["cukereport", "summary", "--format", "JSON", "run.ndjson"]);
        match cli.command {
            Some(Commands::Summary(args)) => {
                assert!(args.is_json());
                assert_eq!(args.events, Some(PathBuf::from("run.ndjson")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
