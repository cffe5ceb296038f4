pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod fix;

pub use checker::Scanner;
pub use config::Config;
pub use error::{DictionaryError, ErrorKind, ScanError};

use serde::Serialize;
use std::path::PathBuf;

/// One occurrence of a known misspelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    /// The token exactly as it appears in the file
    pub word: String,
    pub suggestions: Vec<String>,
}

impl Finding {
    /// The single correction, if the table offers exactly one.
    pub fn unambiguous(&self) -> Option<&str> {
        match self.suggestions.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Files that were read successfully
    pub files_scanned: usize,
    pub findings: Vec<Finding>,
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    /// Put load-time anomalies ahead of the per-file errors.
    pub fn prepend_errors(&mut self, errors: Vec<ScanError>) {
        self.errors.splice(0..0, errors);
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.errors.is_empty()
    }
}
