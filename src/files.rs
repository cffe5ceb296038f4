//! Expands command-line paths into the list of files to scan.

use crate::error::{ErrorKind, ScanError};
use crate::Config;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    exclude_dirs: Vec<String>,
    exclude_extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(exclude_dirs: Vec<String>, exclude_extensions: Vec<String>) -> Self {
        Self {
            exclude_dirs,
            exclude_extensions: exclude_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.exclude_dirs.clone(), config.exclude_extensions.clone())
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.exclude_dirs.iter().any(|d| d == name))
    }

    pub fn is_excluded_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.exclude_extensions.iter().any(|x| *x == ext)
            })
    }
}

/// Expand `paths` in order. Directories are walked recursively in file-name
/// order; plain paths (even nonexistent ones) pass through untouched so the
/// scanner can report them.
pub fn expand(paths: &[PathBuf], filter: &FileFilter) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !filter.is_excluded_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let source = err.path().unwrap_or(path.as_path()).display().to_string();
                    errors.push(ScanError::new(source, ErrorKind::UnreadableFile, err.to_string()));
                    continue;
                }
            };

            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }
            if filter.is_excluded_file(entry.path()) {
                debug!("excluding {}", entry.path().display());
                continue;
            }
            files.push(entry.into_path());
        }
    }

    (files, errors)
}
