//! Soustack Lite document model.
//!
//! This crate owns the recipe document value and the two leaf components
//! every other stage builds on:
//!
//! - **Item normalizer** - classifies any JSON value into a text, structured
//!   or section item and re-filters lists after edits, so lists are never
//!   empty and unknown fields are never dropped.
//! - **Capability stacks** - declare, query and migrate the optional content
//!   areas a document opts into, including legacy `name@version` keys.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no shared state. Every transform takes a value and
//! returns a value, and none of them can fail on malformed input: a value the
//! normalizer does not understand degrades to text, a stack payload migration
//! does not understand stays where it is.
//!
//! ## Example
//!
//! ```
//! use model::{migrate_document, Capability, Document};
//! use serde_json::json;
//!
//! let doc: Document = serde_json::from_value(json!({
//!     "name": "Onion Soup",
//!     "ingredients": ["3 onions", { "name": "stock", "quantity": 1, "unit": "l" }],
//!     "instructions": [{ "section": "Soup", "steps": ["Caramelize onions", "Add stock"] }],
//!     "stacks": { "prep@1": [{ "text": "slice onions" }] }
//! }))
//! .unwrap();
//!
//! let migrated = migrate_document(&doc).into_owned();
//! assert!(migrated.stacks.is_declared(Capability::Prep));
//! assert_eq!(migrated.extensions.prep_items[0].text, "slice onions");
//! ```
mod capability;
mod document;
mod error;
mod extensions;
mod items;
mod migrate;
mod normalize;
mod stacks;

pub use crate::capability::Capability;
pub use crate::document::{clean_name, Document, FormatId, Profile, FORMAT_ID, UNTITLED_NAME};
pub use crate::error::DocumentError;
pub use crate::extensions::{
    Extensions, PrepItem, Provenance, Storage, EQUIPMENT_KEY, IMAGES_KEY, PREP_ITEMS_KEY,
    PROSE_KEY, PROVENANCE_KEY, STORAGE_KEY,
};
pub use crate::items::{
    is_blank_text, Activity, IngredientItem, InstructionItem, Quantity, Section, StepDuration,
    StructuredIngredient, StructuredStep, Timing, PLACEHOLDER,
};
pub use crate::migrate::{migrate_document, migrate_stacks, StackMigration};
pub use crate::normalize::{
    content_leaves, finalize_ingredients, finalize_instructions, finalize_items,
    normalize_ingredient, normalize_ingredients, normalize_instruction, normalize_instructions,
    normalize_item, normalize_list, ContentItem,
};
pub use crate::stacks::{
    disable, enable, is_enabled, CapabilityState, LegacyEntry, StackKey, Stacks, DECLARED,
};
