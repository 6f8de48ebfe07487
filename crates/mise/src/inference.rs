use std::collections::BTreeSet;

use model::{Capability, Document, IngredientItem, InstructionItem, Stacks};

/// Capabilities implied by content shape alone. Declared stacks are ignored.
///
/// | Content                                          | Capability   |
/// |--------------------------------------------------|--------------|
/// | structured ingredient with a quantity or unit    | `structured` |
/// | ingredient with `scaling` / `scalingMode`        | `scaling`    |
/// | step with timing                                 | `timed`      |
/// | step with non-empty `inputs`                     | `referenced` |
/// | any structured step                              | `structured` |
/// | prep items                                       | `prep`       |
/// | storage guidance                                 | `storage`    |
/// | equipment list                                   | `equipment`  |
pub fn infer_capabilities(doc: &Document) -> BTreeSet<Capability> {
    let mut inferred = BTreeSet::new();

    for item in doc.ingredient_leaves() {
        if let IngredientItem::Structured(ingredient) = item {
            if ingredient.has_quantity() || ingredient.has_unit() {
                inferred.insert(Capability::Structured);
            }
            if ingredient.has_scaling() {
                inferred.insert(Capability::Scaling);
            }
        }
    }

    for item in doc.instruction_leaves() {
        if let InstructionItem::Structured(step) = item {
            inferred.insert(Capability::Structured);
            if step.has_timing() {
                inferred.insert(Capability::Timed);
            }
            if step.has_inputs() {
                inferred.insert(Capability::Referenced);
            }
        }
    }

    if !doc.extensions.prep_items.is_empty() {
        inferred.insert(Capability::Prep);
    }
    if doc.extensions.has_storage() {
        inferred.insert(Capability::Storage);
    }
    if !doc.extensions.equipment.is_empty() {
        inferred.insert(Capability::Equipment);
    }
    inferred
}

/// Inferred capabilities that the document does not already enable, in
/// canonical order.
pub fn suggest_capabilities(doc: &Document) -> Vec<Capability> {
    infer_capabilities(doc)
        .into_iter()
        .filter(|capability| !doc.stacks.is_enabled(*capability))
        .collect()
}

/// Declarations for the content-first flow: one per inferred capability.
pub fn infer_stacks(doc: &Document) -> Stacks {
    Stacks::from_capabilities(infer_capabilities(doc))
}
