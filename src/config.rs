use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 8 * 1024 * 1024;

pub const LOCAL_CONFIG_FILE: &str = ".misspell.toml";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Replacement misspelling table; the built-in one when unset
    pub dictionary: Option<PathBuf>,

    pub case_sensitive: bool,

    pub exclude_dirs: Vec<String>,

    pub exclude_extensions: Vec<String>,

    pub max_file_size: u64,

    pub parallel: bool,
}

/// One config file. Only the keys present in the file are set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigLayer {
    pub dictionary: Option<PathBuf>,
    pub case_sensitive: Option<bool>,
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_extensions: Option<Vec<String>>,
    pub max_file_size: Option<u64>,
    pub parallel: Option<bool>,
}

impl ConfigLayer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn default_exclude_dirs() -> Vec<String> {
    [".git", ".svn", ".hg", ".bzr", "CVS", "_darcs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exclude_extensions() -> Vec<String> {
    ["pyc", "pyo", "so", "o", "a", "obj", "dll", "dylib", "exe", "class"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: None,
            case_sensitive: true,
            exclude_dirs: default_exclude_dirs(),
            exclude_extensions: default_exclude_extensions(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            parallel: true,
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(dictionary: Option<PathBuf>, ignore_case: bool, sequential: bool) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                debug!("reading global config {}", global_path.display());
                config = config.merge(ConfigLayer::from_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            debug!("reading local config {}", local_path.display());
            config = config.merge(ConfigLayer::from_file(&local_path)?);
        }

        if dictionary.is_some() {
            config.dictionary = dictionary;
        }
        if ignore_case {
            config.case_sensitive = false;
        }
        if sequential {
            config.parallel = false;
        }

        Ok(config)
    }

    /// A single file layered over the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::default().merge(ConfigLayer::from_file(path)?))
    }

    /// Every key the layer sets wins, even when it equals the default.
    pub fn merge(mut self, layer: ConfigLayer) -> Self {
        if let Some(dictionary) = layer.dictionary {
            self.dictionary = Some(dictionary);
        }
        if let Some(case_sensitive) = layer.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(exclude_dirs) = layer.exclude_dirs {
            self.exclude_dirs = exclude_dirs;
        }
        if let Some(exclude_extensions) = layer.exclude_extensions {
            self.exclude_extensions = exclude_extensions;
        }
        if let Some(max_file_size) = layer.max_file_size {
            self.max_file_size = max_file_size;
        }
        if let Some(parallel) = layer.parallel {
            self.parallel = parallel;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "misspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
