//! Pack configuration and parser limits
//!
//! A pack definition can be kept in a TOML file next to the assets:
//!
//! ```toml
//! output = "game.fas"
//! inputs = ["assets", "shaders/main.glsl"]
//! strip_prefix = "assets"
//!
//! [limits]
//! max_path_length = 1024
//! ```

use crate::error::{FiasError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default archive name when none is given
pub const DEFAULT_OUTPUT: &str = "package.fas";

/// Bounds applied when building or parsing an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of entry records in one archive
    pub max_entries: u32,
    /// Maximum member path length in bytes
    pub max_path_length: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_entries: 1 << 20,
            max_path_length: 4096,
        }
    }
}

impl Limits {
    /// No bounds beyond what the format itself can express
    pub fn unbounded() -> Self {
        Self {
            max_entries: u32::MAX,
            max_path_length: u64::MAX,
        }
    }
}

/// Pack definition loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    pub output: Option<PathBuf>,
    pub inputs: Vec<PathBuf>,
    /// Leading directory removed from member paths
    pub strip_prefix: Option<PathBuf>,
    pub limits: Limits,
}

impl PackConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            FiasError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(config = %path.display(), inputs = config.inputs.len(), "Loaded pack config");
        Ok(config)
    }

    /// Output path, falling back to the default archive name
    pub fn output_or_default(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}
