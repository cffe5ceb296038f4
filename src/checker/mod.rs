pub mod dictionary;
pub mod matcher;
pub mod tokenizer;

use crate::error::{DictionaryError, ErrorKind, ScanError};
use crate::{Config, Finding, ScanReport};
use dictionary::{Dictionary, DictionarySource};
use log::{debug, info};
use matcher::{CaseMode, Matcher};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Bytes inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub case: CaseMode,
    /// Files above this size are refused; 0 disables the limit.
    pub max_file_size: u64,
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            case: CaseMode::Exact,
            max_file_size: crate::config::DEFAULT_MAX_FILE_SIZE,
            parallel: false,
        }
    }
}

impl From<&Config> for ScanOptions {
    fn from(config: &Config) -> Self {
        Self {
            case: if config.case_sensitive {
                CaseMode::Exact
            } else {
                CaseMode::Fallback
            },
            max_file_size: config.max_file_size,
            parallel: config.parallel,
        }
    }
}

pub struct Scanner {
    dictionary: Dictionary,
    options: ScanOptions,
}

impl Scanner {
    pub fn new(dictionary: Dictionary, options: ScanOptions) -> Self {
        Self {
            dictionary,
            options,
        }
    }

    /// Build a scanner from configuration, loading the configured table.
    ///
    /// Dictionary anomalies are returned for the caller to merge into its report.
    pub fn from_config(config: &Config) -> Result<(Self, Vec<ScanError>), DictionaryError> {
        let source = DictionarySource::from_option(config.dictionary.clone());
        let (dictionary, load_errors) = Dictionary::load(&source)?;
        info!("dictionary ready with {} entries", dictionary.len());
        Ok((Self::new(dictionary, ScanOptions::from(config)), load_errors))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.dictionary, self.options.case)
    }

    /// Scan `files` in order. Never fails: unreadable files become errors.
    ///
    /// Findings come out ordered by file (as given), then line, then column,
    /// whether or not the files were scanned in parallel.
    pub fn scan<P: AsRef<Path> + Sync>(&self, files: &[P]) -> ScanReport {
        let results: Vec<Result<Vec<Finding>, ScanError>> = if self.options.parallel {
            files.par_iter().map(|p| self.scan_file(p.as_ref())).collect()
        } else {
            files.iter().map(|p| self.scan_file(p.as_ref())).collect()
        };

        let mut report = ScanReport::default();
        for result in results {
            match result {
                Ok(findings) => {
                    report.files_scanned += 1;
                    report.findings.extend(findings);
                }
                Err(error) => {
                    debug!("{}", error);
                    report.errors.push(error);
                }
            }
        }
        report
    }

    /// Read and scan one file. Binary files yield no findings.
    pub fn scan_file(&self, path: &Path) -> Result<Vec<Finding>, ScanError> {
        let source = path.display().to_string();

        let metadata = fs::metadata(path)
            .map_err(|e| ScanError::new(&source, ErrorKind::UnreadableFile, e.to_string()))?;
        if metadata.is_dir() {
            return Err(ScanError::new(&source, ErrorKind::UnreadableFile, "is a directory"));
        }
        if self.options.max_file_size > 0 && metadata.len() > self.options.max_file_size {
            return Err(ScanError::new(
                &source,
                ErrorKind::FileTooLarge,
                format!(
                    "{} bytes exceeds limit of {} bytes",
                    metadata.len(),
                    self.options.max_file_size
                ),
            ));
        }

        let bytes = fs::read(path)
            .map_err(|e| ScanError::new(&source, ErrorKind::UnreadableFile, e.to_string()))?;

        if is_binary(&bytes) {
            debug!("skipping binary file {}", source);
            return Ok(Vec::new());
        }

        let content = String::from_utf8(bytes)
            .map_err(|e| ScanError::new(&source, ErrorKind::DecodeFailure, e.to_string()))?;

        Ok(self.scan_text(path, &content))
    }

    /// Scan already-decoded text attributed to `path`.
    pub fn scan_text(&self, path: &Path, content: &str) -> Vec<Finding> {
        let matcher = self.matcher();
        let mut findings = Vec::new();

        for (line_number, line) in tokenizer::numbered_lines(content) {
            for token in tokenizer::tokens(line, line_number) {
                let suggestions = matcher.suggestions(token.text);
                if suggestions.is_empty() {
                    continue;
                }
                findings.push(Finding {
                    path: path.to_path_buf(),
                    line: token.line,
                    column: token.column(line),
                    word: token.text.to_string(),
                    suggestions,
                });
            }
        }

        findings
    }
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn scanner(table: &str, options: ScanOptions) -> Scanner {
        let (dict, errors) = Dictionary::parse(table, "test").unwrap();
        assert!(errors.is_empty());
        Scanner::new(dict, options)
    }

    #[test]
    fn test_single_finding_with_line_number() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "first line\nsecond teh line\n").unwrap();

        let report = scanner("teh the\n", ScanOptions::default()).scan(&[&file]);

        assert!(report.errors.is_empty());
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.path, file);
        assert_eq!(finding.line, 2);
        assert_eq!(finding.column, 8);
        assert_eq!(finding.word, "teh");
        assert_eq!(finding.suggestions, vec!["the"]);
    }

    #[test]
    fn test_clean_file_yields_nothing() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clean.rs");
        fs::write(&file, "fn main() {\n    println!(\"the quick fox\");\n}\n").unwrap();

        let report = scanner("teh the\n", ScanOptions::default()).scan(&[&file]);
        assert!(report.findings.is_empty());
        assert!(report.errors.is_empty());
        assert_eq!(report.files_scanned, 1);
    }

    #[test]
    fn test_every_occurrence_is_reported_in_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "teh recieve teh\nok\nrecieve").unwrap();
        fs::write(&b, "teh").unwrap();

        let s = scanner("teh the\nrecieve receive\n", ScanOptions::default());
        let report = s.scan(&[&b, &a]);

        let got: Vec<_> = report
            .findings
            .iter()
            .map(|f| (f.path.file_name().unwrap().to_str().unwrap(), f.line, f.column, f.word.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("b.txt", 1, 1, "teh"),
                ("a.txt", 1, 1, "teh"),
                ("a.txt", 1, 5, "recieve"),
                ("a.txt", 1, 13, "teh"),
                ("a.txt", 3, 1, "recieve"),
            ]
        );
    }

    #[test]
    fn test_unreadable_file_does_not_stop_the_batch() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let good = dir.path().join("good.txt");
        fs::write(&good, "teh").unwrap();

        let report = scanner("teh the\n", ScanOptions::default()).scan(&[&missing, &good]);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ErrorKind::UnreadableFile);
        assert_eq!(report.errors[0].source, missing.display().to_string());
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].path, good);
        assert_eq!(report.files_scanned, 1);
    }

    #[test]
    fn test_invalid_utf8_skips_whole_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("latin1.txt");
        fs::write(&file, b"teh\ncaf\xe9 teh\n").unwrap();

        let report = scanner("teh the\n", ScanOptions::default()).scan(&[&file]);
        assert!(report.findings.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_binary_file_is_skipped_silently() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("blob.bin");
        fs::write(&file, b"teh\x00\x01\x02teh").unwrap();

        let report = scanner("teh the\n", ScanOptions::default()).scan(&[&file]);
        assert!(report.findings.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_oversized_file_is_refused() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("big.txt");
        fs::write(&file, "teh ".repeat(100)).unwrap();

        let options = ScanOptions {
            max_file_size: 16,
            ..Default::default()
        };
        let report = scanner("teh the\n", options).scan(&[&file]);
        assert!(report.findings.is_empty());
        assert_eq!(report.errors[0].kind, ErrorKind::FileTooLarge);
    }

    #[test]
    fn test_directory_argument_is_an_error() {
        let dir = tempdir().unwrap();
        let report = scanner("teh the\n", ScanOptions::default()).scan(&[dir.path()]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ErrorKind::UnreadableFile);
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let dir = tempdir().unwrap();
        let mut files: Vec<PathBuf> = Vec::new();
        for i in 0..24 {
            let file = dir.path().join(format!("f{:02}.txt", i));
            fs::write(&file, format!("line {}\nteh wich\n{}", i, "recieve ".repeat(i % 3))).unwrap();
            files.push(file);
        }
        files.push(dir.path().join("nope.txt"));
        files.reverse();

        let table = "teh the\nwich which,witch\nrecieve receive\n";
        let sequential = scanner(table, ScanOptions::default()).scan(&files);
        let parallel = scanner(
            table,
            ScanOptions {
                parallel: true,
                ..Default::default()
            },
        )
        .scan(&files);

        assert_eq!(sequential.findings, parallel.findings);
        assert_eq!(sequential.errors, parallel.errors);
        assert_eq!(parallel.errors.len(), 1);
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("same.txt");
        fs::write(&file, "Teh wich\nteh").unwrap();

        let s = scanner(
            "teh the\nwich which,witch\n",
            ScanOptions {
                case: CaseMode::Fallback,
                ..Default::default()
            },
        );
        let first = s.scan(&[&file]);
        let second = s.scan(&[&file]);
        assert_eq!(first.findings, second.findings);
        assert_eq!(first.findings[0].word, "Teh");
        assert_eq!(first.findings[0].suggestions, vec!["The"]);
    }
}
