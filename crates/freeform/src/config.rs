//! Configuration for the freeform parser.
//!
//! ```rust
//! use freeform::ParserConfig;
//!
//! let config = ParserConfig::default();
//! assert_eq!(config.max_title_chars, 80);
//! config.validate().expect("defaults are valid");
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Thresholds steering the line heuristics.
///
/// Changing any of them changes parse output for some inputs; the parser is
/// deterministic for a fixed configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Input beyond this many bytes is ignored (cut at a char boundary).
    ///
    /// Default: 256 KiB
    pub max_input_bytes: usize,

    /// Longest line, in characters, still considered as a title.
    ///
    /// Default: `80`
    pub max_title_chars: usize,

    /// How many leading lines are searched for a title.
    ///
    /// Default: `3`
    pub title_scan_lines: usize,

    /// A bulleted line starting with a cooking verb is read as a step once it
    /// has at least this many words; shorter ones stay ingredients
    /// ("- Season to taste").
    ///
    /// Default: `4`
    pub bullet_step_min_words: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 256 * 1024,
            max_title_chars: 80,
            title_scan_lines: 3,
            bullet_step_min_words: 4,
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 {
            return Err(ConfigError::ZeroLimit("max_input_bytes"));
        }
        if self.max_title_chars == 0 {
            return Err(ConfigError::ZeroLimit("max_title_chars"));
        }
        if self.bullet_step_min_words == 0 {
            return Err(ConfigError::ZeroLimit("bullet_step_min_words"));
        }
        Ok(())
    }
}

/// Invalid parser configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("`{0}` must be greater than zero")]
    ZeroLimit(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limits_are_rejected() {
        let cfg = ParserConfig {
            max_title_chars: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroLimit("max_title_chars")));
    }

    #[test]
    fn title_scan_of_zero_is_allowed() {
        let cfg = ParserConfig {
            title_scan_lines: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
