//! The Soustack Lite recipe document.
//!
//! # Structure
//!
//! ```text
//! Document
//! ├── formatId: "soustack/recipe"      # constant
//! ├── profile: lite | core             # default lite
//! ├── name: String                     # never blank
//! ├── description: Option<String>
//! ├── ingredients: Vec<IngredientItem> # never empty
//! ├── instructions: Vec<InstructionItem> # never empty
//! ├── stacks: Stacks                   # capability declarations
//! └── extensions: Extensions           # named bag
//! ```
//!
//! A document is a value. Edits consume it and return a new one, and every
//! edit re-establishes the invariants on its own: a blank name becomes
//! [`UNTITLED_NAME`], an emptied list becomes the placeholder entry.
//!
//! # Examples
//!
//! ```rust
//! use model::{Capability, Document, IngredientItem};
//!
//! let doc = Document::empty()
//!     .with_name("  Best Eggs ")
//!     .with_ingredients(vec![IngredientItem::text("2 eggs"), IngredientItem::text("")])
//!     .with_capability(Capability::Timed, true);
//!
//! assert_eq!(doc.name, "Best Eggs");
//! assert_eq!(doc.ingredients, vec![IngredientItem::text("2 eggs")]);
//! assert!(doc.stacks.is_enabled(Capability::Timed));
//! ```
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::capability::Capability;
use crate::error::DocumentError;
use crate::extensions::Extensions;
use crate::items::{IngredientItem, InstructionItem};
use crate::normalize::{content_leaves, finalize_ingredients, finalize_instructions};
use crate::stacks::Stacks;

/// Identifier written into every document.
pub const FORMAT_ID: &str = "soustack/recipe";

/// Name used when none was supplied.
pub const UNTITLED_NAME: &str = "Untitled Recipe";

/// Marker for the constant `formatId` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatId;

impl Serialize for FormatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(FORMAT_ID)
    }
}

impl<'de> Deserialize<'de> for FormatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == FORMAT_ID {
            Ok(FormatId)
        } else {
            Err(serde::de::Error::custom(DocumentError::UnsupportedFormat(raw)))
        }
    }
}

/// Validation profile a document declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Structural acceptance regardless of content completeness.
    #[default]
    Lite,
    /// Stricter profile; carried through untouched.
    Core,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub format_id: FormatId,
    #[serde(default)]
    pub profile: Profile,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Vec<IngredientItem>,
    pub instructions: Vec<InstructionItem>,
    #[serde(default)]
    pub stacks: Stacks,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// The always-valid empty document.
    pub fn empty() -> Self {
        Self {
            format_id: FormatId,
            profile: Profile::Lite,
            name: UNTITLED_NAME.to_string(),
            description: None,
            ingredients: vec![IngredientItem::placeholder()],
            instructions: vec![InstructionItem::placeholder()],
            stacks: Stacks::new(),
            extensions: Extensions::default(),
        }
    }

    /// Strict loader: the JSON must already be a valid document.
    ///
    /// Items still go through the normalizer, so unknown item shapes are
    /// accepted; what is rejected is a wrong `formatId`, a missing field, a
    /// blank name, an empty list or a list of blank entries other than the
    /// lone placeholder.
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.check_invariants()?;
        Ok(doc)
    }

    /// Pretty-printed JSON, exactly as the document stands.
    pub fn to_pretty_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn check_invariants(&self) -> Result<(), DocumentError> {
        if self.name.trim().is_empty() {
            return Err(DocumentError::EmptyName);
        }
        if self.ingredients.is_empty() {
            return Err(DocumentError::EmptyList("ingredients"));
        }
        if self.instructions.is_empty() {
            return Err(DocumentError::EmptyList("instructions"));
        }
        if only_blank(&self.ingredients, IngredientItem::is_blank, &IngredientItem::placeholder()) {
            return Err(DocumentError::BlankList("ingredients"));
        }
        if only_blank(&self.instructions, InstructionItem::is_blank, &InstructionItem::placeholder()) {
            return Err(DocumentError::BlankList("instructions"));
        }
        Ok(())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = clean_name(&name.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<IngredientItem>) -> Self {
        self.ingredients = finalize_ingredients(ingredients);
        self
    }

    pub fn with_instructions(mut self, instructions: Vec<InstructionItem>) -> Self {
        self.instructions = finalize_instructions(instructions);
        self
    }

    /// Toggles a capability. Content and extensions are never touched.
    pub fn with_capability(mut self, capability: Capability, enabled: bool) -> Self {
        self.stacks = self.stacks.set(capability, enabled);
        self
    }

    pub fn with_stacks(mut self, stacks: Stacks) -> Self {
        self.stacks = stacks;
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Converts every plain step into a structured step with a stable id.
    pub fn promote_instructions(mut self) -> Self {
        let steps = std::mem::take(&mut self.instructions);
        self.instructions = steps
            .into_iter()
            .enumerate()
            .map(|(position, step)| step.promote(position))
            .collect();
        self
    }

    /// Ingredient leaves that carry content (sections flattened).
    pub fn ingredient_leaves(&self) -> Vec<&IngredientItem> {
        content_leaves(&self.ingredients)
    }

    /// Instruction leaves that carry content (sections flattened).
    pub fn instruction_leaves(&self) -> Vec<&InstructionItem> {
        content_leaves(&self.instructions)
    }
}

/// Trims and substitutes [`UNTITLED_NAME`] for blank names.
pub fn clean_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNTITLED_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Every entry is blank, and the list is not the lone placeholder the
/// write-back rule produces.
fn only_blank<T: PartialEq>(items: &[T], is_blank: impl Fn(&T) -> bool, placeholder: &T) -> bool {
    items.iter().all(is_blank) && !(items.len() == 1 && items[0] == *placeholder)
}
