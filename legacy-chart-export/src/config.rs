use crate::prelude::*;
use std::path::Path;

/// settings for a legacy export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// legacy format revision to target. newest supported revision when unset
    pub format_version: Option<u32>,
    /// convert and serialize charts on separate threads
    pub parallel: bool,
    pub compression: ArchiveCompression,
    /// write the set's extra files (audio, backgrounds) next to the charts
    pub include_files: bool,
}
impl ExportConfig {
    /// try to load the config file, falling back to the defaults if it doesnt exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("[Config] {path:?} not found, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// write current config
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format_version: None,
            parallel: false,
            compression: ArchiveCompression::Deflated,
            include_files: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all="snake_case")]
pub enum ArchiveCompression {
    Stored,
    #[default]
    Deflated,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing config: {0}")]
    Json(#[from] serde_json::Error),
}
