use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Knobs for [`crate::compile_seed_with_config`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompilerConfig {
    /// Store seed `meta` as `extensions.provenance`.
    ///
    /// Default: `true`
    pub record_provenance: bool,

    /// Provenance source used when the seed does not name one.
    ///
    /// Default: `"freeform"`
    pub provenance_source: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            record_provenance: true,
            provenance_source: "freeform".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provenance_source.trim().is_empty() {
            return Err(ConfigError::EmptyField("provenance_source"));
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CompilerConfig::default().validate().is_ok());
    }

    #[test]
    fn blank_source_is_rejected() {
        let cfg = CompilerConfig {
            provenance_source: "  ".into(),
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyField("provenance_source"))
        );
    }
}
