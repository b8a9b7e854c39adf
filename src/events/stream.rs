// Recorded event streams - one JSON event per line (NDJSON)

use super::Event;
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventStreamError {
    #[error("failed to read event stream at line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid event at line {line}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl EventStreamError {
    pub fn line(&self) -> usize {
        match self {
            Self::Io { line, .. } | Self::Decode { line, .. } => *line,
        }
    }

    /// Decode failures affect one line; read failures end the stream
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// UTF-8 byte order mark some editors put at the start of a file
const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

/// Iterates over the events of an NDJSON stream, skipping blank lines.
///
/// Lines are read as bytes, so a line that is not valid UTF-8 is a decode
/// error on that line rather than a read failure.
pub struct EventStreamReader<R> {
    reader: R,
    line: usize,
    buffer: Vec<u8>,
    done: bool,
}

impl<R: BufRead> EventStreamReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for EventStreamReader<R> {
    type Item = Result<Event, EventStreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buffer.clear();
            self.line += 1;

            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => {
                    self.done = true;
                    self.line -= 1;
                }
                Ok(_) => {
                    let mut bytes = self.buffer.as_slice();
                    if self.line == 1 {
                        bytes = bytes.strip_prefix(BYTE_ORDER_MARK).unwrap_or(bytes);
                    }
                    let bytes = bytes.trim_ascii();
                    if bytes.is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_slice(bytes).map_err(|source| {
                        EventStreamError::Decode {
                            line: self.line,
                            source,
                        }
                    }));
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(EventStreamError::Io {
                        line: self.line,
                        source,
                    }));
                }
            }
        }
        None
    }
}
