// Config commands - show effective configuration, write a default file

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::Cli;
use crate::config::{self, Config};

pub fn handle_show_config(cli: &Cli, config: Option<&Config>) {
    println!("Current configuration:");
    println!("\n  Command-line arguments:");
    let args = cli.get_report_args();
    match &args.events {
        Some(events) => println!("    Events: {}", events.display()),
        None => println!("    Events: stdin"),
    }
    if let Some(ref output) = args.output {
        println!("    Output: {}", output.display());
    }
    println!("    Compact: {}", args.compact);
    println!("    Strict: {}", args.strict);

    if let Some(cfg) = config {
        println!("\n  Configuration file loaded:");
        if let Some(ref output) = cfg.general.output {
            println!("    Output: {}", output);
        }
        println!("    Strict: {}", cfg.general.strict);
        println!("    Pretty: {}", cfg.report.pretty);
    } else {
        println!("\n  No configuration file loaded");
        println!("  Create one with: cukereport --init-config .cukereportrc.toml");
    }

    println!("\n  Environment variables:");
    match std::env::var(config::ENV_CUKEREPORT_OUTPUT) {
        Ok(output) => println!("    {}: {}", config::ENV_CUKEREPORT_OUTPUT, output),
        Err(_) => println!("    {}: not set (default: stdout)", config::ENV_CUKEREPORT_OUTPUT),
    }

    print_precedence();
}

pub fn handle_init_config(path: &Path) -> Result<()> {
    let toml_content = Config::default().to_toml();
    std::fs::write(path, toml_content)
        .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;
    println!("Configuration file created: {}", path.display());
    println!("\nYou can now edit the file to customize your settings.");
    print_precedence();
    Ok(())
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Configuration file");
    println!("  3. Environment variables");
    println!("  4. Built-in defaults (lowest)");
}
