//! Capability declarations and their legacy versioned form.
//!
//! On the wire a document's `stacks` field is a flat JSON object:
//!
//! ```json
//! { "timed": 1, "prep@1": [{ "text": "dice onion" }], "x-beta": true }
//! ```
//!
//! - `name` → `1` is the current declaration.
//! - `name@version` is a legacy key that may carry any payload. It still
//!   counts as enabled, and [`migrate_stacks`](crate::migrate_stacks)
//!   relocates it once a rule exists for its payload.
//! - Keys naming no known capability are kept verbatim and ignored.
//!
//! Every edit returns a new [`Stacks`]; nothing mutates in place.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::capability::Capability;

/// Value stored under an unversioned key to declare a capability.
pub const DECLARED: u64 = 1;

/// How a single stack key reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKey<'a> {
    /// `timed`
    Declared(Capability),
    /// `prep@1`
    Legacy {
        capability: Capability,
        version: &'a str,
    },
    /// Anything else, preserved but ignored.
    Unknown,
}

impl<'a> StackKey<'a> {
    pub fn parse(key: &'a str) -> Self {
        match key.split_once('@') {
            None => Capability::from_key(key).map_or(StackKey::Unknown, StackKey::Declared),
            Some((name, version)) if !version.is_empty() => Capability::from_key(name)
                .map_or(StackKey::Unknown, |capability| StackKey::Legacy {
                    capability,
                    version,
                }),
            Some(_) => StackKey::Unknown,
        }
    }

    pub fn capability(self) -> Option<Capability> {
        match self {
            StackKey::Declared(capability) | StackKey::Legacy { capability, .. } => {
                Some(capability)
            }
            StackKey::Unknown => None,
        }
    }
}

/// A legacy versioned entry for one capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyEntry<'a> {
    pub version: &'a str,
    pub payload: &'a Value,
}

/// Everything a stack map says about one capability.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityState<'a> {
    pub capability: Capability,
    /// The unversioned key is present.
    pub declared: bool,
    pub legacy: Vec<LegacyEntry<'a>>,
}

impl CapabilityState<'_> {
    pub fn is_enabled(&self) -> bool {
        self.declared || !self.legacy.is_empty()
    }
}

/// The capability map of a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stacks(Map<String, Value>);

impl Stacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    /// A map declaring exactly the given capabilities.
    pub fn from_capabilities<I: IntoIterator<Item = Capability>>(capabilities: I) -> Self {
        capabilities
            .into_iter()
            .fold(Self::new(), |stacks, cap| stacks.enable(cap))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True iff the unversioned key or any `name@version` key is present.
    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.0
            .keys()
            .any(|key| StackKey::parse(key).capability() == Some(capability))
    }

    /// True iff the unversioned key is present.
    pub fn is_declared(&self, capability: Capability) -> bool {
        self.0.contains_key(capability.as_str())
    }

    /// Declares `capability`. Legacy keys for it are left alone; relocating
    /// their payload is migration's job.
    pub fn enable(&self, capability: Capability) -> Stacks {
        let mut next = self.clone();
        next.0
            .insert(capability.as_str().to_string(), Value::from(DECLARED));
        next
    }

    /// Removes the unversioned declaration. Legacy keys for the capability
    /// stay, so a capability backed only by a legacy key still reads as
    /// enabled afterwards.
    pub fn disable(&self, capability: Capability) -> Stacks {
        let mut next = self.clone();
        next.0.remove(capability.as_str());
        next
    }

    pub fn set(&self, capability: Capability, enabled: bool) -> Stacks {
        if enabled {
            self.enable(capability)
        } else {
            self.disable(capability)
        }
    }

    pub fn capability_state(&self, capability: Capability) -> CapabilityState<'_> {
        let legacy = self
            .0
            .iter()
            .filter_map(|(key, payload)| match StackKey::parse(key) {
                StackKey::Legacy {
                    capability: cap,
                    version,
                } if cap == capability => Some(LegacyEntry { version, payload }),
                _ => None,
            })
            .collect();
        CapabilityState {
            capability,
            declared: self.is_declared(capability),
            legacy,
        }
    }

    /// Enabled capabilities in canonical order.
    pub fn enabled_capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.is_enabled(*cap))
            .collect()
    }

    /// Capabilities declared under their unversioned key, in canonical order.
    pub fn declared_capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.is_declared(*cap))
            .collect()
    }

    pub fn legacy_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| matches!(StackKey::parse(key), StackKey::Legacy { .. }))
    }

    pub(crate) fn replace_legacy(&mut self, legacy_key: &str, capability: Capability) {
        self.0.remove(legacy_key);
        self.0
            .insert(capability.as_str().to_string(), Value::from(DECLARED));
    }
}

pub fn is_enabled(stacks: &Stacks, capability: Capability) -> bool {
    stacks.is_enabled(capability)
}

pub fn enable(stacks: &Stacks, capability: Capability) -> Stacks {
    stacks.enable(capability)
}

pub fn disable(stacks: &Stacks, capability: Capability) -> Stacks {
    stacks.disable(capability)
}
