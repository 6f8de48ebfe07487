//! The fixed set of capabilities ("stacks") a document can declare.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// An optional content area a document may opt into.
///
/// Declaring a capability is independent of whether matching content exists;
/// see `mise` for the advisory cross-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Prep,
    Equipment,
    Timed,
    Storage,
    Scaling,
    Structured,
    Referenced,
    Illustrated,
}

impl Capability {
    /// Every capability in canonical order.
    pub const ALL: [Capability; 8] = [
        Capability::Prep,
        Capability::Equipment,
        Capability::Timed,
        Capability::Storage,
        Capability::Scaling,
        Capability::Structured,
        Capability::Referenced,
        Capability::Illustrated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Prep => "prep",
            Capability::Equipment => "equipment",
            Capability::Timed => "timed",
            Capability::Storage => "storage",
            Capability::Scaling => "scaling",
            Capability::Structured => "structured",
            Capability::Referenced => "referenced",
            Capability::Illustrated => "illustrated",
        }
    }

    /// Exact, case-sensitive match against the stack key spelling.
    pub fn from_key(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.as_str() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| DocumentError::UnknownCapability(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>().ok(), Some(cap));
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "garnish".parse::<Capability>().unwrap_err();
        assert!(matches!(err, DocumentError::UnknownCapability(name) if name == "garnish"));
    }
}
