//! The named extension bag carried by every document.
//!
//! A handful of keys have a shape this crate understands; everything else is
//! kept verbatim in [`Extensions::other`]. A known key whose value does not
//! fit its shape is also kept in `other`, so loading never loses data.
//!
//! | Key          | Type                  |
//! |--------------|-----------------------|
//! | `provenance` | [`Provenance`]        |
//! | `prose`      | list of strings       |
//! | `prepItems`  | list of [`PrepItem`]  |
//! | `storage`    | [`Storage`]           |
//! | `equipment`  | list of strings       |
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

pub const PROVENANCE_KEY: &str = "provenance";
pub const PROSE_KEY: &str = "prose";
pub const PREP_ITEMS_KEY: &str = "prepItems";
pub const STORAGE_KEY: &str = "storage";
pub const EQUIPMENT_KEY: &str = "equipment";
pub const IMAGES_KEY: &str = "images";

/// How a document's content was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Producer of the content, e.g. `"freeform"`.
    #[serde(default)]
    pub source: String,
    pub confidence: f64,
    pub mode: String,
}

/// A mise-en-place task done before cooking starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepItem {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PrepItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

/// Storage guidance for leftovers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Kept as authored; only its presence is interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Storage {
    pub fn has_duration(&self) -> bool {
        match &self.duration {
            None | Some(Value::Null) => false,
            Some(Value::String(text)) => !text.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// A method or a location is present.
    pub fn has_place(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.method) || filled(&self.location)
    }

    pub fn is_empty(&self) -> bool {
        !self.has_duration() && !self.has_place() && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extensions {
    pub provenance: Option<Provenance>,
    pub prose: Vec<String>,
    pub prep_items: Vec<PrepItem>,
    pub storage: Option<Storage>,
    pub equipment: Vec<String>,
    /// Every other key, verbatim.
    pub other: Map<String, Value>,
}

impl Extensions {
    /// Reads the bag from any JSON value. Non-objects yield an empty bag.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map.clone()),
            Value::Null => Self::default(),
            other => {
                debug!(kind = json_kind(other), "extensions_not_an_object");
                Self::default()
            }
        }
    }

    pub fn from_map(mut other: Map<String, Value>) -> Self {
        Self {
            provenance: take_typed(&mut other, PROVENANCE_KEY),
            prose: take_typed(&mut other, PROSE_KEY).unwrap_or_default(),
            prep_items: take_typed(&mut other, PREP_ITEMS_KEY).unwrap_or_default(),
            storage: take_typed(&mut other, STORAGE_KEY),
            equipment: take_typed(&mut other, EQUIPMENT_KEY).unwrap_or_default(),
            other,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.provenance.is_none()
            && self.prose.is_empty()
            && self.prep_items.is_empty()
            && self.storage.is_none()
            && self.equipment.is_empty()
            && self.other.is_empty()
    }

    /// True when `key` is a known key held verbatim because its value did not
    /// have the expected shape.
    pub fn has_unreadable(&self, key: &str) -> bool {
        self.other.contains_key(key)
    }

    /// Storage guidance as far as it can be read. Falls back to a lenient
    /// read of a `storage` entry kept verbatim (explicit nulls, odd field
    /// types), which is never written back.
    pub fn storage_view(&self) -> Option<Storage> {
        if let Some(storage) = &self.storage {
            return Some(storage.clone());
        }
        let raw = self.other.get(STORAGE_KEY)?;
        serde_json::from_value(raw.clone()).ok()
    }

    pub fn has_storage(&self) -> bool {
        self.storage_view().is_some_and(|storage| !storage.is_empty())
    }

    pub fn has_images(&self) -> bool {
        match self.other.get(IMAGES_KEY) {
            Some(Value::Array(images)) => !images.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }
}

/// Types `key` only when nothing would be lost writing it back.
fn take_typed<T: DeserializeOwned + Serialize>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key)?;
    let typed = serde_json::from_value::<T>(value.clone()).ok()?;
    if serde_json::to_value(&typed).ok().as_ref() != Some(value) {
        debug!(key, "extension_read_lossy");
        return None;
    }
    map.remove(key);
    Some(typed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(provenance) = &self.provenance {
            map.serialize_entry(PROVENANCE_KEY, provenance)?;
        }
        if !self.prose.is_empty() {
            map.serialize_entry(PROSE_KEY, &self.prose)?;
        }
        if !self.prep_items.is_empty() {
            map.serialize_entry(PREP_ITEMS_KEY, &self.prep_items)?;
        }
        if let Some(storage) = &self.storage {
            map.serialize_entry(STORAGE_KEY, storage)?;
        }
        if !self.equipment.is_empty() {
            map.serialize_entry(EQUIPMENT_KEY, &self.equipment)?;
        }
        // A typed key that is set wins over a verbatim entry with the same name.
        for (key, value) in &self.other {
            let shadowed = match key.as_str() {
                PROVENANCE_KEY => self.provenance.is_some(),
                PROSE_KEY => !self.prose.is_empty(),
                PREP_ITEMS_KEY => !self.prep_items.is_empty(),
                STORAGE_KEY => self.storage.is_some(),
                EQUIPMENT_KEY => !self.equipment.is_empty(),
                _ => false,
            };
            if !shadowed {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
