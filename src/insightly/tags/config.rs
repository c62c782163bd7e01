use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::insightly::tags::error::Result;

/// Run settings that rarely change between invocations. Every field has a
/// default so a partial or absent file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Directory that reports and error logs are written to.
    pub output_dir: PathBuf,
    /// Comma-separated course codes.
    pub courses_file: PathBuf,
    /// Comma-separated tutor first names.
    pub tutors_file: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            courses_file: PathBuf::from("courses.txt"),
            tutors_file: PathBuf::from("tutors.txt"),
        }
    }
}

impl ToolConfig {
    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: ToolConfig = serde_json::from_str(&data)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Uses the file when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
