use model::{
    Capability, Document, IngredientItem, InstructionItem, StructuredIngredient, StructuredStep,
    EQUIPMENT_KEY, PREP_ITEMS_KEY,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A softer signal exists, or enabling `structured` would resolve it.
    Info,
    /// The capability means nothing without the missing piece.
    Warning,
}

/// One advisory finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiseCheck {
    /// Stable identifier, e.g. `storage-incomplete`.
    pub id: String,
    pub severity: Severity,
    pub message: String,
    /// Declared capability the finding belongs to.
    pub capability: Capability,
}

impl MiseCheck {
    fn new(
        capability: Capability,
        id: &str,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message: message.into(),
            capability,
        }
    }
}

/// Content leaves split by variant. Placeholders and sections are skipped.
struct ContentView<'a> {
    ingredients: Vec<&'a IngredientItem>,
    structured_ingredients: Vec<&'a StructuredIngredient>,
    steps: Vec<&'a InstructionItem>,
    structured_steps: Vec<&'a StructuredStep>,
}

impl<'a> ContentView<'a> {
    fn of(doc: &'a Document) -> Self {
        let ingredients = doc.ingredient_leaves();
        let steps = doc.instruction_leaves();
        let structured_ingredients = ingredients
            .iter()
            .copied()
            .filter_map(|item| match item {
                IngredientItem::Structured(ingredient) => Some(ingredient),
                _ => None,
            })
            .collect();
        let structured_steps = steps
            .iter()
            .copied()
            .filter_map(|item| match item {
                InstructionItem::Structured(step) => Some(step),
                _ => None,
            })
            .collect();
        Self {
            ingredients,
            structured_ingredients,
            steps,
            structured_steps,
        }
    }
}

/// Cross-checks every enabled capability against the content it implies.
///
/// Findings come out in canonical capability order, at most a few per
/// capability. Capabilities that are not enabled are never reported on.
///
/// ```
/// use mise::{compute_mise_checks, Severity};
/// use model::{Capability, Document};
///
/// let doc = Document::empty().with_capability(Capability::Storage, true);
/// let checks = compute_mise_checks(&doc);
/// assert_eq!(checks[0].id, "storage-incomplete");
/// assert_eq!(checks[0].severity, Severity::Warning);
/// ```
pub fn compute_mise_checks(doc: &Document) -> Vec<MiseCheck> {
    let view = ContentView::of(doc);
    let mut checks = Vec::new();

    for capability in doc.stacks.enabled_capabilities() {
        match capability {
            Capability::Prep => check_prep(doc, &mut checks),
            Capability::Equipment => check_equipment(doc, &mut checks),
            Capability::Timed => check_timed(&view, &mut checks),
            Capability::Storage => check_storage(doc, &mut checks),
            Capability::Scaling => check_scaling(&view, &mut checks),
            Capability::Structured => check_structured(&view, &mut checks),
            Capability::Referenced => check_referenced(&view, &mut checks),
            Capability::Illustrated => check_illustrated(doc, &view, &mut checks),
        }
    }

    debug!(
        enabled = doc.stacks.enabled_capabilities().len(),
        findings = checks.len(),
        "mise_checks_computed"
    );
    checks
}

fn check_prep(doc: &Document, checks: &mut Vec<MiseCheck>) {
    if doc.extensions.prep_items.is_empty() && !doc.extensions.has_unreadable(PREP_ITEMS_KEY) {
        checks.push(MiseCheck::new(
            Capability::Prep,
            "prep-missing",
            Severity::Warning,
            "Prep is enabled but no prep items are listed.",
        ));
    }
}

fn check_equipment(doc: &Document, checks: &mut Vec<MiseCheck>) {
    if doc.extensions.equipment.is_empty() && !doc.extensions.has_unreadable(EQUIPMENT_KEY) {
        checks.push(MiseCheck::new(
            Capability::Equipment,
            "equipment-missing",
            Severity::Warning,
            "Equipment is enabled but no equipment is listed.",
        ));
    }
}

fn check_timed(view: &ContentView<'_>, checks: &mut Vec<MiseCheck>) {
    if view.structured_steps.is_empty() {
        checks.push(MiseCheck::new(
            Capability::Timed,
            "timed-plain-steps",
            Severity::Info,
            "Steps are plain text, so they cannot carry timing. Enable structured steps to add durations.",
        ));
        return;
    }
    let timed = view
        .structured_steps
        .iter()
        .filter(|step| step.has_timing())
        .count();
    if timed == 0 {
        checks.push(MiseCheck::new(
            Capability::Timed,
            "timed-missing",
            Severity::Warning,
            "Timed is enabled but no step has a duration.",
        ));
    } else if timed < view.structured_steps.len() {
        checks.push(MiseCheck::new(
            Capability::Timed,
            "timed-partial",
            Severity::Info,
            format!(
                "{} of {} steps have no duration.",
                view.structured_steps.len() - timed,
                view.structured_steps.len()
            ),
        ));
    }
}

fn check_storage(doc: &Document, checks: &mut Vec<MiseCheck>) {
    let (has_duration, has_place) = doc
        .extensions
        .storage_view()
        .map_or((false, false), |storage| {
            (storage.has_duration(), storage.has_place())
        });
    if !has_duration && !has_place {
        checks.push(MiseCheck::new(
            Capability::Storage,
            "storage-incomplete",
            Severity::Warning,
            "Storage is enabled but neither a duration nor a method or location is given.",
        ));
    } else if !has_duration {
        checks.push(MiseCheck::new(
            Capability::Storage,
            "storage-partial",
            Severity::Info,
            "Storage has a method or location but no duration.",
        ));
    } else if !has_place {
        checks.push(MiseCheck::new(
            Capability::Storage,
            "storage-partial",
            Severity::Info,
            "Storage has a duration but no method or location.",
        ));
    }
}

fn check_scaling(view: &ContentView<'_>, checks: &mut Vec<MiseCheck>) {
    if view.structured_ingredients.is_empty() {
        checks.push(MiseCheck::new(
            Capability::Scaling,
            "scaling-plain-ingredients",
            Severity::Info,
            "Ingredients are plain text, so amounts cannot be scaled. Enable structured ingredients to add quantities.",
        ));
    } else if !view
        .structured_ingredients
        .iter()
        .any(|ingredient| ingredient.has_quantity())
    {
        checks.push(MiseCheck::new(
            Capability::Scaling,
            "scaling-missing-quantities",
            Severity::Warning,
            "Scaling is enabled but no ingredient has a quantity.",
        ));
    }
}

fn check_structured(view: &ContentView<'_>, checks: &mut Vec<MiseCheck>) {
    if view.structured_ingredients.is_empty() && view.structured_steps.is_empty() {
        checks.push(MiseCheck::new(
            Capability::Structured,
            "structured-unused",
            Severity::Info,
            "Structured is enabled but every ingredient and step is plain text.",
        ));
    }
}

fn check_referenced(view: &ContentView<'_>, checks: &mut Vec<MiseCheck>) {
    if view.structured_steps.is_empty() {
        checks.push(MiseCheck::new(
            Capability::Referenced,
            "referenced-plain-steps",
            Severity::Info,
            "Steps are plain text, so they cannot reference ingredients. Enable structured steps to link inputs.",
        ));
        return;
    }
    let linked = view
        .structured_steps
        .iter()
        .filter(|step| step.has_inputs())
        .count();
    if linked == 0 {
        checks.push(MiseCheck::new(
            Capability::Referenced,
            "referenced-missing-inputs",
            Severity::Warning,
            "Referenced is enabled but no step lists its inputs.",
        ));
    } else if linked < view.structured_steps.len() {
        checks.push(MiseCheck::new(
            Capability::Referenced,
            "referenced-partial",
            Severity::Info,
            format!(
                "{} of {} steps list no inputs.",
                view.structured_steps.len() - linked,
                view.structured_steps.len()
            ),
        ));
    }
}

fn check_illustrated(doc: &Document, view: &ContentView<'_>, checks: &mut Vec<MiseCheck>) {
    let illustrated = doc.extensions.has_images()
        || view.steps.iter().any(|step| step.has_image())
        || view.ingredients.iter().any(|item| item.has_image());
    if !illustrated {
        checks.push(MiseCheck::new(
            Capability::Illustrated,
            "illustrated-missing",
            Severity::Warning,
            "Illustrated is enabled but there are no images.",
        ));
    }
}

#[cfg(test)]
mod tests {
    use model::{Extensions, PrepItem, Stacks, Storage};
    use serde_json::json;

    use super::*;

    fn doc(value: serde_json::Value) -> Document {
        serde_json::from_value(value).expect("document")
    }

    fn ids(checks: &[MiseCheck]) -> Vec<&str> {
        checks.iter().map(|check| check.id.as_str()).collect()
    }

    #[test]
    fn storage_without_object_is_incomplete() {
        let d = doc(json!({
            "name": "Stew",
            "ingredients": ["beef"],
            "instructions": ["Braise"],
            "stacks": { "storage": 1 }
        }));
        let checks = compute_mise_checks(&d);
        assert!(checks.iter().any(|check| check.id == "storage-incomplete"
            && check.severity == Severity::Warning
            && check.capability == Capability::Storage));
    }

    #[test]
    fn storage_partial_is_info() {
        let mut extensions = Extensions::default();
        extensions.storage = Some(Storage {
            location: Some("fridge".into()),
            ..Default::default()
        });
        let d = Document::empty()
            .with_extensions(extensions)
            .with_capability(Capability::Storage, true);
        let checks = compute_mise_checks(&d);
        assert_eq!(ids(&checks), vec!["storage-partial"]);
        assert_eq!(checks[0].severity, Severity::Info);
    }

    #[test]
    fn complete_storage_is_quiet() {
        let d = doc(json!({
            "name": "Stew",
            "ingredients": ["beef"],
            "instructions": ["Braise"],
            "stacks": { "storage": 1 },
            "extensions": { "storage": { "method": "airtight", "duration": { "days": 3 } } }
        }));
        assert!(compute_mise_checks(&d).is_empty());
    }

    #[test]
    fn storage_with_explicit_nulls_is_still_read() {
        let d = doc(json!({
            "name": "Stew",
            "ingredients": ["beef"],
            "instructions": ["Braise"],
            "stacks": { "storage": 1 },
            "extensions": { "storage": { "method": "airtight", "duration": null } }
        }));
        assert_eq!(ids(&compute_mise_checks(&d)), vec!["storage-partial"]);
    }

    #[test]
    fn disabled_capabilities_are_not_checked() {
        assert!(compute_mise_checks(&Document::empty()).is_empty());
    }

    #[test]
    fn timed_escalates_with_structure() {
        let plain = Document::empty()
            .with_instructions(vec![InstructionItem::text("Bake")])
            .with_capability(Capability::Timed, true);
        assert_eq!(ids(&compute_mise_checks(&plain)), vec!["timed-plain-steps"]);

        let untimed = doc(json!({
            "name": "Bread",
            "ingredients": ["flour"],
            "instructions": [{ "text": "Knead" }, { "text": "Bake" }],
            "stacks": { "timed": 1 }
        }));
        let checks = compute_mise_checks(&untimed);
        assert_eq!(ids(&checks), vec!["timed-missing"]);
        assert_eq!(checks[0].severity, Severity::Warning);

        let partial = doc(json!({
            "name": "Bread",
            "ingredients": ["flour"],
            "instructions": [
                { "text": "Knead", "timing": { "duration": { "minutes": 10 } } },
                { "text": "Bake" }
            ],
            "stacks": { "timed": 1 }
        }));
        let checks = compute_mise_checks(&partial);
        assert_eq!(ids(&checks), vec!["timed-partial"]);
        assert_eq!(checks[0].message, "1 of 2 steps have no duration.");
    }

    #[test]
    fn referenced_reports_missing_and_partial_inputs() {
        let none = doc(json!({
            "name": "Salad",
            "ingredients": ["lettuce"],
            "instructions": [{ "text": "Toss", "inputs": [] }],
            "stacks": { "referenced": 1 }
        }));
        assert_eq!(ids(&compute_mise_checks(&none)), vec!["referenced-missing-inputs"]);

        let partial = doc(json!({
            "name": "Salad",
            "ingredients": ["lettuce"],
            "instructions": [{ "text": "Wash", "inputs": ["lettuce"] }, { "text": "Serve" }],
            "stacks": { "referenced": 1 }
        }));
        assert_eq!(ids(&compute_mise_checks(&partial)), vec!["referenced-partial"]);
    }

    #[test]
    fn scaling_and_structured_checks() {
        let plain = Document::empty().with_stacks(Stacks::from_capabilities([
            Capability::Scaling,
            Capability::Structured,
        ]));
        assert_eq!(
            ids(&compute_mise_checks(&plain)),
            vec!["scaling-plain-ingredients", "structured-unused"]
        );

        let no_quantity = doc(json!({
            "name": "Tea",
            "ingredients": [{ "name": "tea leaves" }],
            "instructions": ["Steep"],
            "stacks": { "scaling": 1 }
        }));
        assert_eq!(
            ids(&compute_mise_checks(&no_quantity)),
            vec!["scaling-missing-quantities"]
        );
    }

    #[test]
    fn prep_equipment_and_images() {
        let d = Document::empty().with_stacks(Stacks::from_capabilities([
            Capability::Prep,
            Capability::Equipment,
            Capability::Illustrated,
        ]));
        assert_eq!(
            ids(&compute_mise_checks(&d)),
            vec!["prep-missing", "equipment-missing", "illustrated-missing"]
        );

        let mut extensions = Extensions::default();
        extensions.prep_items.push(PrepItem::new("dice onion"));
        extensions.equipment.push("dutch oven".into());
        extensions.other.insert("images".into(), json!(["cover.jpg"]));
        assert!(compute_mise_checks(&d.with_extensions(extensions)).is_empty());
    }

    #[test]
    fn legacy_declaration_is_checked() {
        let d = doc(json!({
            "name": "Stew",
            "ingredients": ["beef"],
            "instructions": ["Braise"],
            "stacks": { "prep@1": { "future": true } }
        }));
        assert_eq!(ids(&compute_mise_checks(&d)), vec!["prep-missing"]);
    }

    #[test]
    fn checks_never_mutate() {
        let d = Document::empty().with_capability(Capability::Timed, true);
        let before = d.clone();
        let _ = compute_mise_checks(&d);
        assert_eq!(d, before);
    }
}
