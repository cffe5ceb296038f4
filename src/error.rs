use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the run before any file is scanned.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary file not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read dictionary {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build dictionary index: {0}")]
    Index(#[from] fst::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    UnreadableFile,
    DecodeFailure,
    FileTooLarge,
    MalformedDictionaryEntry,
    DuplicateDictionaryEntry,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnreadableFile => "unreadable file",
            ErrorKind::DecodeFailure => "decode failure",
            ErrorKind::FileTooLarge => "file too large",
            ErrorKind::MalformedDictionaryEntry => "malformed dictionary line",
            ErrorKind::DuplicateDictionaryEntry => "duplicate dictionary entry",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem recorded during loading or scanning.
///
/// `source` is a file path, or `<builtin>` for the embedded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ScanError {
    pub fn new(source: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line: None,
            kind,
            message: message.into(),
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}: {}", self.source, line, self.kind, self.message),
            None => write!(f, "{}: {}: {}", self.source, self.kind, self.message),
        }
    }
}
