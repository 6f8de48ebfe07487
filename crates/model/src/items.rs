//! Ingredient and instruction item variants.
//!
//! Both lists of a recipe document hold a closed sum type with three shapes:
//!
//! ```text
//! IngredientItem / InstructionItem
//! ├── Text(String)                  # "2 eggs", "Crack the eggs"
//! ├── Structured(..)                # { "name": "egg", "quantity": 2, ... }
//! └── Section(Section<Self>)        # { "section": { "name": "Sauce", "items": [...] } }
//! ```
//!
//! Structured items keep every field this schema version does not know about
//! in an `extra` map, so a document written by a newer editor survives a pass
//! through this crate unchanged. A known field carrying the wrong JSON type is
//! treated the same way: it stays in `extra`, verbatim.
//!
//! Deserialization never fails for well-formed JSON. It routes through the
//! normalizer ([`normalize_ingredient`](crate::normalize_ingredient) and
//! [`normalize_instruction`](crate::normalize_instruction)), which classifies
//! any value into exactly one variant.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::normalize::{normalize_ingredient, normalize_instruction};

/// Reserved entry keeping an item list non-empty without representing content.
pub const PLACEHOLDER: &str = "(not provided)";

/// Namespace for step ids derived by [`InstructionItem::promote`].
const STEP_ID_NAMESPACE: Uuid = Uuid::NAMESPACE_OID;

/// Returns true for text that carries no content: blank or the placeholder.
pub fn is_blank_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER
}

/// A named group of items. Sections nest one level in practice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub name: String,
    pub items: Vec<T>,
}

impl<T> Section<T> {
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[derive(Serialize)]
struct SectionWire<'a, T: Serialize> {
    section: &'a Section<T>,
}

/// A quantity as authored: a JSON number or free text such as `"1 1/2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(Number),
    Text(String),
}

impl Quantity {
    pub fn is_blank(&self) -> bool {
        matches!(self, Quantity::Text(text) if text.trim().is_empty())
    }
}

/// Ingredient with named fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredIngredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Scaling behaviour, kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling: Option<Value>,
    /// Fields unknown to this schema version, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StructuredIngredient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_quantity(&self) -> bool {
        self.quantity.as_ref().is_some_and(|q| !q.is_blank())
    }

    pub fn has_unit(&self) -> bool {
        self.unit.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// True when either the typed `scaling` field or a legacy `scalingMode`
    /// field is present.
    pub fn has_scaling(&self) -> bool {
        self.scaling.is_some() || self.extra.contains_key("scalingMode")
    }

    fn is_blank(&self) -> bool {
        is_blank_text(&self.name)
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.scaling.is_none()
            && self.extra.is_empty()
    }
}

/// Whether a timed step needs attention or runs unattended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Active,
    Passive,
}

/// Step duration in minutes, exact or as a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepDuration {
    Range {
        #[serde(rename = "minMinutes")]
        min_minutes: Number,
        #[serde(rename = "maxMinutes")]
        max_minutes: Number,
    },
    Exact {
        minutes: Number,
    },
}

impl StepDuration {
    pub fn exact(minutes: u64) -> Self {
        StepDuration::Exact {
            minutes: Number::from(minutes),
        }
    }

    pub fn range(min_minutes: u64, max_minutes: u64) -> Self {
        StepDuration::Range {
            min_minutes: Number::from(min_minutes),
            max_minutes: Number::from(max_minutes),
        }
    }
}

/// Timing block attached to a structured step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    pub duration: StepDuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_cue: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Instruction step with named fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
    /// References to the ingredients this step consumes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<String>>,
    /// Fields unknown to this schema version, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StructuredStep {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when the step carries timing, typed or preserved in a shape this
    /// version could not read.
    pub fn has_timing(&self) -> bool {
        self.timing.is_some() || self.extra.contains_key("timing")
    }

    pub fn has_inputs(&self) -> bool {
        self.inputs
            .as_ref()
            .is_some_and(|inputs| inputs.iter().any(|input| !input.trim().is_empty()))
    }

    fn is_blank(&self) -> bool {
        is_blank_text(&self.text)
            && self.id.is_none()
            && self.timing.is_none()
            && self.inputs.is_none()
            && self.extra.is_empty()
    }
}

/// One entry of a document's ingredient list.
#[derive(Debug, Clone, PartialEq)]
pub enum IngredientItem {
    Text(String),
    Structured(StructuredIngredient),
    Section(Section<IngredientItem>),
}

impl IngredientItem {
    pub fn text(text: impl Into<String>) -> Self {
        IngredientItem::Text(text.into())
    }

    pub fn placeholder() -> Self {
        IngredientItem::Text(PLACEHOLDER.to_string())
    }

    /// Blank text, the placeholder, an empty structured entry or an unnamed
    /// section without items.
    pub fn is_blank(&self) -> bool {
        match self {
            IngredientItem::Text(text) => is_blank_text(text),
            IngredientItem::Structured(item) => item.is_blank(),
            IngredientItem::Section(section) => {
                section.name.trim().is_empty() && section.items.is_empty()
            }
        }
    }

    /// Carries an `image` field.
    pub fn has_image(&self) -> bool {
        matches!(self, IngredientItem::Structured(item) if item.extra.contains_key("image"))
    }
}

impl Serialize for IngredientItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IngredientItem::Text(text) => serializer.serialize_str(text),
            IngredientItem::Structured(item) => item.serialize(serializer),
            IngredientItem::Section(section) => SectionWire { section }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for IngredientItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(normalize_ingredient(&value))
    }
}

/// One entry of a document's instruction list.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionItem {
    Text(String),
    Structured(StructuredStep),
    Section(Section<InstructionItem>),
}

impl InstructionItem {
    pub fn text(text: impl Into<String>) -> Self {
        InstructionItem::Text(text.into())
    }

    pub fn placeholder() -> Self {
        InstructionItem::Text(PLACEHOLDER.to_string())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            InstructionItem::Text(text) => is_blank_text(text),
            InstructionItem::Structured(step) => step.is_blank(),
            InstructionItem::Section(section) => {
                section.name.trim().is_empty() && section.items.is_empty()
            }
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self, InstructionItem::Structured(step) if step.extra.contains_key("image"))
    }

    /// Turns a plain step into a structured one with a deterministic id.
    ///
    /// The id is a UUIDv5 over the step's path in the list and its text, so
    /// promoting the same list twice yields the same ids. A step inside a
    /// section is keyed as `position/index`, which never collides with a
    /// top-level position. Placeholder text and structured steps are returned
    /// unchanged.
    pub fn promote(self, position: usize) -> Self {
        self.promote_at(&position.to_string())
    }

    fn promote_at(self, path: &str) -> Self {
        match self {
            InstructionItem::Text(text) if !is_blank_text(&text) => {
                let id = step_id(path, &text);
                InstructionItem::Structured(StructuredStep {
                    id: Some(id),
                    text,
                    ..Default::default()
                })
            }
            InstructionItem::Section(section) => {
                let Section { name, items } = section;
                let items = items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| item.promote_at(&format!("{path}/{idx}")))
                    .collect();
                InstructionItem::Section(Section { name, items })
            }
            other => other,
        }
    }
}

fn step_id(path: &str, text: &str) -> String {
    let key = format!("{path}\0{}", text.trim());
    Uuid::new_v5(&STEP_ID_NAMESPACE, key.as_bytes()).to_string()
}

impl Serialize for InstructionItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InstructionItem::Text(text) => serializer.serialize_str(text),
            InstructionItem::Structured(step) => step.serialize(serializer),
            InstructionItem::Section(section) => SectionWire { section }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for InstructionItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(normalize_instruction(&value))
    }
}
