use serde::{Deserialize, Serialize};

/// Which path produced a [`ParseResult`]. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Explicit section headers drove the split.
    Headers,
    /// No headers; lines were classified by list markers and leading words.
    Markers,
    /// Nothing classified.
    None,
}

impl ParseMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ParseMode::Headers => "headers",
            ParseMode::Markers => "markers",
            ParseMode::None => "none",
        }
    }
}

impl std::fmt::Display for ParseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`crate::parse`].
///
/// Captured lines have their list markers stripped but otherwise keep the
/// pasted characters. Lines that fit neither list land in `prose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prose: Vec<String>,
    /// In `[0, 1]`; `0` when neither list captured anything.
    pub confidence: f64,
    pub mode: ParseMode,
}

impl ParseResult {
    pub fn empty() -> Self {
        Self {
            title: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prose: Vec::new(),
            confidence: 0.0,
            mode: ParseMode::None,
        }
    }

    /// True when neither list captured a line.
    pub fn is_unclassified(&self) -> bool {
        self.ingredients.is_empty() && self.instructions.is_empty()
    }
}

impl Default for ParseResult {
    fn default() -> Self {
        Self::empty()
    }
}
