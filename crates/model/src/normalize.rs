//! Content item normalizer.
//!
//! Classifies one arbitrary JSON value into exactly one item variant. The
//! first matching rule wins:
//!
//! ```text
//! 1. string                                   -> Text
//! 2. { "section": { "items": [..] } }         -> Section (children normalized)
//! 3. { "section": "Name", "steps"|"items": [..] } (legacy) -> Section
//! 4. object with the primary field as string  -> Structured (other fields kept)
//!    ("name" for ingredients, "text" for instructions)
//! 5. anything else                            -> Text of the stringified value
//! ```
//!
//! The write-back rule lives here too: after any edit the owning list is
//! re-filtered ([`finalize_ingredients`], [`finalize_instructions`]) so blank
//! and placeholder entries disappear and an empty list becomes the single
//! placeholder entry again.
//!
//! ```rust
//! use model::{normalize_ingredients, IngredientItem};
//! use serde_json::json;
//!
//! let items = normalize_ingredients(&json!(["2 eggs", "", { "name": "salt" }, 4]));
//! assert_eq!(items.len(), 3);
//! assert_eq!(items[2], IngredientItem::text("4"));
//! ```
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::items::{
    IngredientItem, InstructionItem, Quantity, Section, StructuredIngredient, StructuredStep,
    Timing,
};

/// Behaviour shared by the two item lists so the normalizer and the
/// write-back filter are written once.
pub trait ContentItem: Sized {
    /// Field whose presence (as a string) marks an object as structured.
    const PRIMARY_FIELD: &'static str;

    fn from_text(text: String) -> Self;
    fn from_section(section: Section<Self>) -> Self;
    /// Builds the structured variant; `None` when the primary field is
    /// missing or not a string.
    fn from_fields(fields: &Map<String, Value>) -> Option<Self>;
    fn placeholder() -> Self;
    fn is_blank(&self) -> bool;
    fn as_section(&self) -> Option<&Section<Self>>;
    fn as_section_mut(&mut self) -> Option<&mut Section<Self>>;
}

impl ContentItem for IngredientItem {
    const PRIMARY_FIELD: &'static str = "name";

    fn from_text(text: String) -> Self {
        IngredientItem::Text(text)
    }

    fn from_section(section: Section<Self>) -> Self {
        IngredientItem::Section(section)
    }

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        let Some(Value::String(name)) = fields.get(Self::PRIMARY_FIELD) else {
            return None;
        };
        let mut extra = fields.clone();
        extra.remove(Self::PRIMARY_FIELD);
        let quantity = take_typed::<Quantity>(&mut extra, "quantity");
        let unit = take_typed::<String>(&mut extra, "unit");
        let scaling = extra.remove("scaling");
        Some(IngredientItem::Structured(StructuredIngredient {
            name: name.clone(),
            quantity,
            unit,
            scaling,
            extra,
        }))
    }

    fn placeholder() -> Self {
        IngredientItem::placeholder()
    }

    fn is_blank(&self) -> bool {
        IngredientItem::is_blank(self)
    }

    fn as_section(&self) -> Option<&Section<Self>> {
        match self {
            IngredientItem::Section(section) => Some(section),
            _ => None,
        }
    }

    fn as_section_mut(&mut self) -> Option<&mut Section<Self>> {
        match self {
            IngredientItem::Section(section) => Some(section),
            _ => None,
        }
    }
}

impl ContentItem for InstructionItem {
    const PRIMARY_FIELD: &'static str = "text";

    fn from_text(text: String) -> Self {
        InstructionItem::Text(text)
    }

    fn from_section(section: Section<Self>) -> Self {
        InstructionItem::Section(section)
    }

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        let Some(Value::String(text)) = fields.get(Self::PRIMARY_FIELD) else {
            return None;
        };
        let mut extra = fields.clone();
        extra.remove(Self::PRIMARY_FIELD);
        let id = take_typed::<String>(&mut extra, "id");
        let timing = take_typed::<Timing>(&mut extra, "timing");
        let inputs = take_typed::<Vec<String>>(&mut extra, "inputs");
        Some(InstructionItem::Structured(StructuredStep {
            id,
            text: text.clone(),
            timing,
            inputs,
            extra,
        }))
    }

    fn placeholder() -> Self {
        InstructionItem::placeholder()
    }

    fn is_blank(&self) -> bool {
        InstructionItem::is_blank(self)
    }

    fn as_section(&self) -> Option<&Section<Self>> {
        match self {
            InstructionItem::Section(section) => Some(section),
            _ => None,
        }
    }

    fn as_section_mut(&mut self) -> Option<&mut Section<Self>> {
        match self {
            InstructionItem::Section(section) => Some(section),
            _ => None,
        }
    }
}

/// Moves `key` out of `fields` when it deserializes as `T` and serializes
/// back to the same value; otherwise the value stays where it was, untouched.
///
/// A shape that only partially fits `T` (explicit nulls, unknown nested
/// keys, mixed duration forms) is kept verbatim rather than read lossily.
fn take_typed<T: DeserializeOwned + Serialize>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Option<T> {
    let value = fields.get(key)?;
    let typed = serde_json::from_value::<T>(value.clone()).ok()?;
    if serde_json::to_value(&typed).ok().as_ref() != Some(value) {
        trace!(key, "typed_read_lossy");
        return None;
    }
    fields.remove(key);
    Some(typed)
}

/// Classifies a single value. Never fails.
pub fn normalize_item<T: ContentItem>(value: &Value) -> T {
    match value {
        Value::String(text) => T::from_text(text.clone()),
        Value::Object(fields) => {
            if let Some(section) = canonical_section::<T>(fields) {
                return T::from_section(section);
            }
            if let Some(section) = legacy_section::<T>(fields) {
                return T::from_section(section);
            }
            if let Some(item) = T::from_fields(fields) {
                return item;
            }
            trace!(primary = T::PRIMARY_FIELD, "item_stringified");
            T::from_text(stringify(value))
        }
        other => T::from_text(stringify(other)),
    }
}

fn canonical_section<T: ContentItem>(fields: &Map<String, Value>) -> Option<Section<T>> {
    let Some(Value::Object(section)) = fields.get("section") else {
        return None;
    };
    let Some(Value::Array(items)) = section.get("items") else {
        return None;
    };
    let name = match section.get("name") {
        Some(Value::String(name)) => name.clone(),
        _ => String::new(),
    };
    Some(Section {
        name,
        items: items.iter().map(normalize_item::<T>).collect(),
    })
}

fn legacy_section<T: ContentItem>(fields: &Map<String, Value>) -> Option<Section<T>> {
    let Some(Value::String(name)) = fields.get("section") else {
        return None;
    };
    let items = match (fields.get("steps"), fields.get("items")) {
        (Some(Value::Array(items)), _) | (None, Some(Value::Array(items))) => items,
        _ => return None,
    };
    Some(Section {
        name: name.clone(),
        items: items.iter().map(normalize_item::<T>).collect(),
    })
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Write-back filter: drops blank and placeholder entries (recursively inside
/// sections) and substitutes the placeholder when nothing remains.
pub fn finalize_items<T: ContentItem>(items: Vec<T>) -> Vec<T> {
    let mut kept: Vec<T> = items.into_iter().filter_map(prune).collect();
    if kept.is_empty() {
        kept.push(T::placeholder());
    }
    kept
}

fn prune<T: ContentItem>(mut item: T) -> Option<T> {
    if let Some(section) = item.as_section_mut() {
        let children = std::mem::take(&mut section.items);
        section.items = children.into_iter().filter_map(prune).collect();
    }
    (!item.is_blank()).then_some(item)
}

/// Coerces `value` to a list (non-arrays count as empty), normalizes every
/// entry and applies the write-back filter.
pub fn normalize_list<T: ContentItem>(value: &Value) -> Vec<T> {
    let items = match value {
        Value::Array(entries) => entries.iter().map(normalize_item::<T>).collect(),
        _ => Vec::new(),
    };
    finalize_items(items)
}

/// Leaf items (sections flattened) that carry content.
pub fn content_leaves<T: ContentItem>(items: &[T]) -> Vec<&T> {
    let mut leaves = Vec::new();
    collect_leaves(items, &mut leaves);
    leaves
}

fn collect_leaves<'a, T: ContentItem>(items: &'a [T], out: &mut Vec<&'a T>) {
    for item in items {
        match item.as_section() {
            Some(section) => collect_leaves(&section.items, out),
            None if !item.is_blank() => out.push(item),
            None => {}
        }
    }
}

pub fn normalize_ingredient(value: &Value) -> IngredientItem {
    normalize_item(value)
}

pub fn normalize_instruction(value: &Value) -> InstructionItem {
    normalize_item(value)
}

pub fn normalize_ingredients(value: &Value) -> Vec<IngredientItem> {
    normalize_list(value)
}

pub fn normalize_instructions(value: &Value) -> Vec<InstructionItem> {
    normalize_list(value)
}

pub fn finalize_ingredients(items: Vec<IngredientItem>) -> Vec<IngredientItem> {
    finalize_items(items)
}

pub fn finalize_instructions(items: Vec<InstructionItem>) -> Vec<InstructionItem> {
    finalize_items(items)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::items::{PLACEHOLDER, StepDuration};

    #[test]
    fn string_becomes_text() {
        assert_eq!(
            normalize_ingredient(&json!("2 eggs")),
            IngredientItem::text("2 eggs")
        );
    }

    #[test]
    fn canonical_section_normalizes_children() {
        let item = normalize_instruction(&json!({
            "section": { "name": "Sauce", "items": ["Melt butter", { "text": "Whisk" }] }
        }));
        let InstructionItem::Section(section) = item else {
            panic!("expected a section");
        };
        assert_eq!(section.name, "Sauce");
        assert_eq!(section.items[0], InstructionItem::text("Melt butter"));
        assert!(matches!(section.items[1], InstructionItem::Structured(_)));
    }

    #[test]
    fn legacy_section_shape_is_coerced() {
        let item = normalize_instruction(&json!({ "section": "Dough", "steps": ["Knead"] }));
        assert_eq!(
            item,
            InstructionItem::Section(Section::new("Dough", vec![InstructionItem::text("Knead")]))
        );
    }

    #[test]
    fn structured_ingredient_keeps_unknown_fields() {
        let item = normalize_ingredient(&json!({
            "name": "flour",
            "quantity": 2,
            "unit": "cups",
            "sifted": true,
            "x-future": { "nested": [1, 2] }
        }));
        let IngredientItem::Structured(inner) = item else {
            panic!("expected structured ingredient");
        };
        assert_eq!(inner.name, "flour");
        assert_eq!(inner.unit.as_deref(), Some("cups"));
        assert_eq!(inner.extra.get("sifted"), Some(&json!(true)));
        assert_eq!(inner.extra.get("x-future"), Some(&json!({ "nested": [1, 2] })));
    }

    #[test]
    fn ill_typed_known_field_is_preserved_verbatim() {
        let raw = json!({ "text": "Rest", "timing": "overnight", "inputs": "dough" });
        let item = normalize_instruction(&raw);
        let InstructionItem::Structured(ref step) = item else {
            panic!("expected structured step");
        };
        assert!(step.timing.is_none());
        assert!(step.has_timing());
        assert_eq!(serde_json::to_value(&item).expect("serialize"), raw);
    }

    #[test]
    fn timed_step_parses_exact_duration() {
        let item = normalize_instruction(&json!({
            "text": "Bake",
            "timing": { "activity": "passive", "duration": { "minutes": 25 }, "completionCue": "golden" }
        }));
        let InstructionItem::Structured(step) = item else {
            panic!("expected structured step");
        };
        let timing = step.timing.expect("timing parsed");
        assert_eq!(timing.duration, StepDuration::exact(25));
        assert_eq!(timing.completion_cue.as_deref(), Some("golden"));
    }

    #[test]
    fn partially_readable_timing_is_kept_verbatim() {
        let raw = json!([
            {
                "text": "Bake",
                "timing": {
                    "activity": null,
                    "duration": { "minutes": 25, "x-source": "oven manual" },
                    "completionCue": null
                }
            },
            { "text": "Simmer", "timing": { "duration": { "minMinutes": 10, "maxMinutes": 20, "minutes": 15 } } }
        ]);
        let steps = normalize_instructions(&raw);
        for step in &steps {
            let InstructionItem::Structured(step) = step else {
                panic!("expected structured step, got {step:?}");
            };
            assert!(step.timing.is_none());
            assert!(step.has_timing());
        }
        assert_eq!(serde_json::to_value(&steps).expect("serialize"), raw);
    }

    #[test]
    fn timing_extra_fields_stay_typed() {
        let raw = json!({
            "text": "Proof",
            "timing": { "duration": { "minutes": 45 }, "x-temp": "warm" }
        });
        let item = normalize_instruction(&raw);
        let InstructionItem::Structured(ref step) = item else {
            panic!("expected structured step");
        };
        let timing = step.timing.as_ref().expect("timing parsed");
        assert_eq!(timing.extra.get("x-temp"), Some(&json!("warm")));
        assert_eq!(serde_json::to_value(&item).expect("serialize"), raw);
    }

    #[test]
    fn object_without_primary_field_is_stringified() {
        assert_eq!(
            normalize_ingredient(&json!({ "text": "salt" })),
            IngredientItem::text(r#"{"text":"salt"}"#)
        );
        assert_eq!(normalize_ingredient(&json!(true)), IngredientItem::text("true"));
        assert_eq!(normalize_instruction(&json!(null)), InstructionItem::text(""));
    }

    #[test]
    fn non_string_primary_field_is_not_structured() {
        assert_eq!(
            normalize_ingredient(&json!({ "name": 5 })),
            IngredientItem::text(r#"{"name":5}"#)
        );
    }

    #[test]
    fn finalize_drops_blank_entries_and_substitutes_placeholder() {
        let items = finalize_ingredients(vec![
            IngredientItem::text(" "),
            IngredientItem::placeholder(),
        ]);
        assert_eq!(items, vec![IngredientItem::text(PLACEHOLDER)]);

        let items = finalize_ingredients(vec![
            IngredientItem::placeholder(),
            IngredientItem::text("salt"),
        ]);
        assert_eq!(items, vec![IngredientItem::text("salt")]);
    }

    #[test]
    fn finalize_prunes_inside_sections() {
        let items = finalize_instructions(vec![
            InstructionItem::Section(Section::new(
                "Prep",
                vec![InstructionItem::text(""), InstructionItem::text("Chop")],
            )),
            InstructionItem::Section(Section::new("", vec![InstructionItem::text(" ")])),
        ]);
        assert_eq!(
            items,
            vec![InstructionItem::Section(Section::new(
                "Prep",
                vec![InstructionItem::text("Chop")]
            ))]
        );
    }

    #[test]
    fn non_array_list_is_placeholder() {
        assert_eq!(
            normalize_instructions(&json!("just one string")),
            vec![InstructionItem::placeholder()]
        );
        assert_eq!(normalize_ingredients(&json!(null)), vec![IngredientItem::placeholder()]);
    }

    #[test]
    fn renormalizing_is_a_no_op() {
        let raw = json!([
            "2 eggs",
            { "name": "milk", "quantity": "1/2", "unit": "cup", "note": "whole" },
            { "section": { "name": "Topping", "items": ["sugar", { "name": "cinnamon", "scaling": { "mode": "fixed" } }] } },
            { "section": "Legacy", "items": ["zest"] }
        ]);
        let once = normalize_ingredients(&raw);
        let reserialized = serde_json::to_value(&once).expect("serialize");
        let twice = normalize_ingredients(&reserialized);
        assert_eq!(once, twice);

        let steps = json!([
            { "text": "Rise", "timing": { "activity": null, "duration": { "minutes": 60, "x-source": "card" } } },
            { "text": "Bake", "timing": { "duration": { "minMinutes": 20, "maxMinutes": 25 }, "completionCue": "hollow" } },
            { "text": "Cool", "id": null, "inputs": null }
        ]);
        let once = normalize_instructions(&steps);
        let reserialized = serde_json::to_value(&once).expect("serialize");
        assert_eq!(reserialized, steps);
        assert_eq!(once, normalize_instructions(&reserialized));
    }

    #[test]
    fn unknown_fields_survive_an_edit_cycle() {
        let raw = json!([{ "text": "Whisk", "inputs": ["eggs"], "x-tool": "whisk" }]);
        let mut steps = normalize_instructions(&raw);
        if let InstructionItem::Structured(step) = &mut steps[0] {
            step.text = "Whisk vigorously".into();
        }
        let steps = normalize_instructions(&serde_json::to_value(finalize_instructions(steps)).expect("serialize"));
        let InstructionItem::Structured(step) = &steps[0] else {
            panic!("expected structured step");
        };
        assert_eq!(step.text, "Whisk vigorously");
        assert_eq!(step.extra.get("x-tool"), Some(&json!("whisk")));
        assert_eq!(step.inputs.as_deref(), Some(&["eggs".to_string()][..]));
    }

    #[test]
    fn content_leaves_flatten_sections_and_skip_placeholders() {
        let items = vec![
            IngredientItem::text("salt"),
            IngredientItem::Section(Section::new("Dough", vec![IngredientItem::text("flour")])),
            IngredientItem::placeholder(),
        ];
        let leaves = content_leaves(&items);
        assert_eq!(leaves.len(), 2);
    }
}
