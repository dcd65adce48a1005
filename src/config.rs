//! Export settings file support
//!
//! Remembers the last used export options in `.swagger-export.toml` and
//! applies environment variable overrides on load.

use crate::models::{Encoding, SchemaVersion};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings filename
pub const SETTINGS_FILENAME: &str = ".swagger-export.toml";

/// Environment variable for the target folder
pub const ENV_TARGET: &str = "SWAGGER_EXPORT_TARGET";

/// Environment variable for the encoding
pub const ENV_FORMAT: &str = "SWAGGER_EXPORT_FORMAT";

/// Environment variable for the schema version
pub const ENV_VERSION: &str = "SWAGGER_EXPORT_VERSION";

/// Last used export options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub base_path: String,

    #[serde(default)]
    pub target_folder: String,

    #[serde(default)]
    pub format: Encoding,

    /// API version label written into legacy documents
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub schema_version: SchemaVersion,
}

fn default_api_version() -> String {
    crate::export::builder::DEFAULT_API_VERSION.to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            target_folder: String::new(),
            format: Encoding::default(),
            api_version: default_api_version(),
            schema_version: SchemaVersion::default(),
        }
    }
}

impl ExportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the settings file inside a directory
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILENAME)
    }

    /// Load settings from a directory
    ///
    /// Falls back to defaults if the file does not exist. Environment
    /// overrides are applied in both cases.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut settings = Self::load_file(dir)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Load settings from a directory without environment overrides
    pub fn load_file(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    /// Parse settings from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save settings to a directory, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create settings directory: {}", dir.display()))?;
        let path = Self::path_in(dir);
        std::fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup
    ///
    /// Unparsable format or version values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(target) = lookup(ENV_TARGET)
            && !target.trim().is_empty()
        {
            self.target_folder = target;
        }

        if let Some(format) = lookup(ENV_FORMAT)
            && let Ok(format) = format.parse()
        {
            self.format = format;
        }

        if let Some(version) = lookup(ENV_VERSION)
            && let Ok(version) = version.parse()
        {
            self.schema_version = version;
        }
    }
}
