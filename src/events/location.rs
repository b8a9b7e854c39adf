// Source locations - the correlation key between parse-time and run-time events

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in feature source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub uri: String,
    pub line: u32,
}

/// A test case is identified by its declared source location.
/// For outline instances this is the example row, not the template.
pub type CaseIdentity = SourceLocation;

impl SourceLocation {
    pub fn new(uri: impl Into<String>, line: u32) -> Self {
        Self {
            uri: uri.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uri, self.line)
    }
}
