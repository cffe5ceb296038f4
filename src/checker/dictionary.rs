use crate::checker::tokenizer;
use crate::error::{DictionaryError, ErrorKind, ScanError};
use fst::Map;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name used for errors raised by the embedded table.
pub const BUILTIN_SOURCE: &str = "<builtin>";

const BUILTIN_TABLE: &str = include_str!("../../data/misspellings.txt");

/// Where the misspelling table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    Builtin,
    File(PathBuf),
}

impl DictionarySource {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(DictionarySource::Builtin, DictionarySource::File)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Lowercased misspelling, unique within a dictionary
    pub misspelling: String,
    /// The misspelling as written in the table
    pub spelling: String,
    /// Replacement candidates in authored order, never empty
    pub corrections: Vec<String>,
}

/// Read-only misspelling table.
///
/// Entries keep the order in which their keys first appeared in the source;
/// an FST maps each key to its position for lookups.
pub struct Dictionary {
    index: Map<Vec<u8>>,
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    /// Load a table, returning it together with every line-level anomaly.
    ///
    /// Only a missing or unreadable override file is fatal.
    pub fn load(source: &DictionarySource) -> Result<(Self, Vec<ScanError>), DictionaryError> {
        match source {
            DictionarySource::Builtin => Self::parse(BUILTIN_TABLE, BUILTIN_SOURCE),
            DictionarySource::File(path) => Self::load_from_path(path),
        }
    }

    pub fn builtin() -> Result<(Self, Vec<ScanError>), DictionaryError> {
        Self::load(&DictionarySource::Builtin)
    }

    /// Read an override table. Lines that are not valid UTF-8 are reported
    /// as malformed, not fatal.
    pub fn load_from_path(path: &Path) -> Result<(Self, Vec<ScanError>), DictionaryError> {
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => DictionaryError::Missing {
                path: path.to_path_buf(),
            },
            _ => DictionaryError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Self::parse_bytes(&bytes, &path.display().to_string())
    }

    /// Parse table text. Malformed lines are skipped, duplicates overwrite.
    pub fn parse(text: &str, source_name: &str) -> Result<(Self, Vec<ScanError>), DictionaryError> {
        Self::parse_bytes(text.as_bytes(), source_name)
    }

    /// Parse raw table bytes, decoding each line on its own.
    pub fn parse_bytes(
        bytes: &[u8],
        source_name: &str,
    ) -> Result<(Self, Vec<ScanError>), DictionaryError> {
        let mut entries: Vec<DictionaryEntry> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut errors = Vec::new();

        for (idx, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            let line_number = idx + 1;
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    errors.push(
                        ScanError::new(
                            source_name,
                            ErrorKind::MalformedDictionaryEntry,
                            format!("line is not valid UTF-8: {}", e),
                        )
                        .at_line(line_number),
                    );
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let entry = match parse_line(line) {
                Ok(entry) => entry,
                Err(message) => {
                    errors.push(
                        ScanError::new(source_name, ErrorKind::MalformedDictionaryEntry, message)
                            .at_line(line_number),
                    );
                    continue;
                }
            };

            match positions.get(&entry.misspelling) {
                Some(&pos) => {
                    warn!(
                        "{}:{}: duplicate entry for '{}', later definition wins",
                        source_name, line_number, entry.misspelling
                    );
                    errors.push(
                        ScanError::new(
                            source_name,
                            ErrorKind::DuplicateDictionaryEntry,
                            format!("'{}' redefined", entry.misspelling),
                        )
                        .at_line(line_number),
                    );
                    entries[pos] = entry;
                }
                None => {
                    positions.insert(entry.misspelling.clone(), entries.len());
                    entries.push(entry);
                }
            }
        }

        let mut keys: Vec<(String, u64)> = positions
            .into_iter()
            .map(|(key, pos)| (key, pos as u64))
            .collect();
        keys.sort_unstable();
        let index = Map::from_iter(keys)?;

        debug!(
            "loaded {} entries from {} ({} anomalies)",
            entries.len(),
            source_name,
            errors.len()
        );

        Ok((Self { index, entries }, errors))
    }

    /// Entry for a token in any case: the token itself first, then its
    /// lowercase form. Callers compare against `spelling` for exact matches.
    pub fn lookup(&self, word: &str) -> Option<&DictionaryEntry> {
        self.get(word).or_else(|| {
            if word.chars().any(char::is_uppercase) {
                self.get(&word.to_lowercase())
            } else {
                None
            }
        })
    }

    /// Lookup of an already-normalised (lowercase) key.
    pub fn get(&self, misspelling: &str) -> Option<&DictionaryEntry> {
        self.index
            .get(misspelling.as_bytes())
            .and_then(|pos| self.entries.get(pos as usize))
    }

    pub fn contains(&self, misspelling: &str) -> bool {
        self.index.contains_key(misspelling.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// `(spelling, "c1,c2")` pairs in table order, keys as authored.
    pub fn dump(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.spelling.clone(), e.corrections.join(",")))
            .collect()
    }
}

/// Parse one `<misspelling> <c1>[,<c2>...]` line.
pub fn parse_line(line: &str) -> Result<DictionaryEntry, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(format!("expected 2 fields, found {}", fields.len()));
    }

    let spelling = fields[0].to_string();
    let misspelling = spelling.to_lowercase();
    if !tokenizer::is_word(&misspelling) {
        return Err(format!("'{}' is not a single word", fields[0]));
    }

    let mut corrections: Vec<String> = Vec::new();
    for candidate in fields[1].split(',').map(str::trim) {
        if !candidate.is_empty() && !corrections.iter().any(|c| c == candidate) {
            corrections.push(candidate.to_string());
        }
    }
    if corrections.is_empty() {
        return Err(format!("no corrections given for '{}'", fields[0]));
    }

    Ok(DictionaryEntry {
        misspelling,
        spelling,
        corrections,
    })
}
