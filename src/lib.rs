//! Workspace umbrella crate for Soustack Lite recipe documents.
//!
//! This crate stitches the stages together so callers can go from pasted
//! text or stored JSON to a valid document with a single call:
//!
//! ```text
//! text ──▶ freeform::parse ──▶ LiteSeed ──▶ compiler::compile_seed ──▶ Document
//! stored JSON ──▶ compiler::normalize_document (memoized) ──▶ Document
//! Document ──▶ mise::compute_mise_checks / mise::suggest_capabilities
//! ```
//!
//! ```
//! use soustack::{document_from_text, compute_mise_checks, Capability};
//!
//! let doc = document_from_text("Best Eggs\nIngredients:\n- 2 eggs\n- salt\nInstructions:\n1. Crack eggs\n2. Cook in pan");
//! assert_eq!(doc.name, "Best Eggs");
//! assert!(doc.stacks.is_empty());
//!
//! let doc = doc.with_capability(Capability::Timed, true);
//! assert_eq!(compute_mise_checks(&doc)[0].id, "timed-plain-steps");
//! ```

mod config;
mod memo;

pub use compiler::{
    compile, compile_seed, compile_seed_with_config, normalize_document, CompilerConfig,
    LiteSeed, ParseMeta,
};
pub use freeform::{parse, parse_with_config, ParseMode, ParseResult, ParserConfig};
pub use mise::{
    compute_mise_checks, infer_capabilities, infer_stacks, suggest_capabilities, MiseCheck,
    Severity,
};
pub use model::{
    disable, enable, finalize_ingredients, finalize_instructions, is_enabled, migrate_document,
    migrate_stacks, normalize_ingredient, normalize_ingredients, normalize_instruction,
    normalize_instructions, Capability, CapabilityState, Document, DocumentError, Extensions,
    IngredientItem, InstructionItem, PrepItem, Profile, Provenance, Section, StackMigration,
    Stacks, Storage, StructuredIngredient, StructuredStep, Timing, FORMAT_ID, PLACEHOLDER,
    UNTITLED_NAME,
};

pub use crate::config::{ConfigLoadError, SoustackConfig};
pub use crate::memo::NormalizeMemo;

use serde_json::Value;
use tracing::debug;

/// Turns a parse result into compiler input. The title becomes the name and
/// the parse confidence and mode become provenance.
pub fn seed_from_parse(result: ParseResult) -> LiteSeed {
    let ParseResult {
        title,
        ingredients,
        instructions,
        prose,
        confidence,
        mode,
    } = result;
    LiteSeed {
        name: title,
        prose,
        meta: Some(ParseMeta::new(confidence, mode.as_str())),
        ..LiteSeed::default()
    }
    .with_ingredient_lines(ingredients)
    .with_instruction_lines(instructions)
}

/// Parses pasted text and compiles it with default configuration.
pub fn document_from_text(text: &str) -> Document {
    document_from_text_with_config(text, &SoustackConfig::default())
}

/// Parses pasted text and compiles it. Never fails: unreadable text yields
/// the placeholder document with zero-confidence provenance.
pub fn document_from_text_with_config(text: &str, config: &SoustackConfig) -> Document {
    let parsed = parse_with_config(text, &config.parser);
    compile_seed_with_config(seed_from_parse(parsed), &config.compiler)
}

/// Public read path for a published recipe.
///
/// `None` means no record exists for the identifier and is passed through.
/// A record whose recipe data is missing or is not a JSON object resolves
/// to the always-valid `compile({})` document; anything else is normalized
/// leniently.
pub fn resolve_published(stored: Option<&Value>) -> Option<Document> {
    let stored = stored?;
    if !stored.is_object() {
        debug!("published_recipe_unreadable");
        return Some(compile(&Value::Object(Default::default())));
    }
    Some(normalize_document(stored))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn seed_carries_parse_output() {
        let seed = seed_from_parse(parse("Cheese Toast\n- bread\n- cheese\n1. Toast the bread"));
        assert_eq!(seed.name.as_deref(), Some("Cheese Toast"));
        assert_eq!(seed.ingredients, json!(["bread", "cheese"]));
        assert_eq!(seed.instructions, json!(["Toast the bread"]));
        assert_eq!(seed.meta.as_ref().map(|meta| meta.mode.as_str()), Some("markers"));
    }

    #[test]
    fn published_lookup_distinguishes_missing_from_malformed() {
        assert_eq!(resolve_published(None), None);

        let fallback = resolve_published(Some(&Value::Null)).expect("record exists");
        assert_eq!(fallback, compile(&json!({})));

        let stored = json!({ "name": "Soup", "ingredients": ["water"], "instructions": ["Boil"] });
        let doc = resolve_published(Some(&stored)).expect("record exists");
        assert_eq!(doc.name, "Soup");
    }
}
