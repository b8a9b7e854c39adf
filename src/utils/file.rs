// Input/output helpers for event streams and report files

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// File utilities
pub struct FileUtils;

impl FileUtils {
    /// `-` (or no path at all) means the standard stream
    pub fn is_std_stream(path: Option<&Path>) -> bool {
        path.is_none_or(|p| p.as_os_str() == "-")
    }

    /// Open an event stream: a file, or stdin when no path (or `-`) is given
    pub fn open_events(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
        match path {
            Some(p) if !Self::is_std_stream(Some(p)) => {
                let file = File::open(p)
                    .with_context(|| format!("Failed to open event stream: {}", p.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }

    /// Create the report destination: a file, or stdout when no path (or `-`) is given.
    /// Missing parent directories are created.
    pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
        match path {
            Some(p) if !Self::is_std_stream(Some(p)) => {
                if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create report directory: {}", parent.display())
                    })?;
                }
                let file = File::create(p)
                    .with_context(|| format!("Failed to create report file: {}", p.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            _ => Ok(Box::new(io::stdout())),
        }
    }
}
