//! YAML configuration for the text-to-document pipeline.
//!
//! Both stage configs live in one file and are validated together on load.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "recipe-importer"
//!
//! parser:
//!   max_input_bytes: 262144
//!   max_title_chars: 80
//!   title_scan_lines: 3
//!   bullet_step_min_words: 4
//!
//! compiler:
//!   record_provenance: true
//!   provenance_source: "freeform"
//! ```
//!
//! Every section and every field is optional; missing ones take their
//! defaults. Only `version` is required.

use std::fs;
use std::path::Path;

use compiler::CompilerConfig;
use freeform::ParserConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("invalid parser config: {0}")]
    Parser(#[from] freeform::ConfigError),

    #[error("invalid compiler config: {0}")]
    Compiler(#[from] compiler::ConfigError),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for [`crate::document_from_text_with_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SoustackConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl SoustackConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SoustackConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.parser.validate()?;
        self.compiler.validate()?;
        Ok(())
    }
}

impl Default for SoustackConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            parser: ParserConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}
