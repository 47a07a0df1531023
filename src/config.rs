//! JSON run configuration.
//!
//! Selects the dataset and policy for a run and where to read descriptor
//! files from and write traces to:
//!
//! ```json
//! {
//!   "dataset": "small",
//!   "algorithm": "mlfq",
//!   "boost_threshold": 15,
//!   "input_dir": "Process_List",
//!   "output_dir": "Schedulers"
//! }
//! ```
//!
//! Every field is optional. Input files resolve to
//! `<input_dir>/<dataset>/<file>` and traces to
//! `<output_dir>/<dataset>/<algorithm>_out_<suffix>`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::policy::{Algorithm, Tunables};
use crate::types::Tick;

/// Errors from loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// JSON parse error.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Dataset subdirectory under both `input_dir` and `output_dir`.
    pub dataset: Option<String>,
    pub algorithm: Algorithm,
    pub boost_threshold: Option<Tick>,
    pub base_quantum: Option<Tick>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl SimConfig {
    /// Parse a configuration from JSON text.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn tunables(&self) -> Tunables {
        Tunables {
            boost_threshold: self.boost_threshold,
            base_quantum: self.base_quantum,
        }
    }

    /// Resolve a descriptor file name against `input_dir` and `dataset`.
    ///
    /// Absolute paths are returned unchanged.
    pub fn input_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            return file.to_path_buf();
        }
        self.under(self.input_dir.as_deref(), file)
    }

    /// Where the trace for `input` is written by default.
    ///
    /// The file name is `<algorithm>_out_<suffix>`, where the suffix is the
    /// part of the input file name after its first `_` (e.g. `process_3`
    /// gives `3`), or the whole name when it has none.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = stem.split_once('_').map_or(stem.as_str(), |(_, s)| s);
        let name = format!("{}_out_{}", self.algorithm, suffix);
        self.under(self.output_dir.as_deref(), Path::new(&name))
    }

    fn under(&self, root: Option<&Path>, file: &Path) -> PathBuf {
        let mut path = root.map(Path::to_path_buf).unwrap_or_default();
        if let Some(dataset) = &self.dataset {
            path.push(dataset);
        }
        path.push(file);
        path
    }
}
