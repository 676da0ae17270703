//! Source locations carried by every IR node and diagnostic.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// A position in a source file, surviving through linking and validation so
/// diagnostics always reference the original site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Location {
    pub file: Arc<PathBuf>,
    pub line: u32,
    pub column: u32,
    pub span: u32,
}

impl Location {
    pub fn new(file: Arc<PathBuf>, line: u32, column: u32, span: u32) -> Self {
        Self {
            file,
            line,
            column,
            span,
        }
    }

    /// A synthetic location for declarations inferred by the linker rather
    /// than written in source (e.g. an inferred `app` declaration).
    pub fn synthetic(file: Arc<PathBuf>) -> Self {
        Self {
            file,
            line: 0,
            column: 0,
            span: 0,
        }
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.file.as_path(), self.line, self.column).cmp(&(
            other.file.as_path(),
            other.line,
            other.column,
        ))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.display(),
            self.line,
            self.column
        )
    }
}
