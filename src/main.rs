// Main entry point for cukereport

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cukereport::cli::{Cli, Commands};
use cukereport::commands;
use cukereport::config::Config;
use cukereport::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting cukereport v{}", env!("CARGO_PKG_VERSION"));
    }

    // Load configuration from file (if exists)
    let loaded = Config::load();

    if cli.config {
        commands::handle_show_config(&cli, loaded.as_ref());
        return Ok(());
    }

    if let Some(config_file) = &cli.init_config {
        return commands::handle_init_config(config_file);
    }

    if let Some(shell_type) = &cli.completion {
        return commands::handle_completion(shell_type);
    }

    let config = loaded.unwrap_or_default();

    match &cli.command {
        Some(Commands::Summary(args)) => commands::handle_summary(args, &config),
        Some(Commands::Report(_)) | None => {
            commands::handle_report(cli.get_report_args(), &config)
        }
    }
}
