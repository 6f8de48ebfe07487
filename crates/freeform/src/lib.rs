//! Freeform recipe text parser.
//!
//! Turns whatever a user pastes (a blog post, a note, a photo transcript)
//! into a title, an ingredient list and an instruction list that the
//! compiler can assemble into a document.
//!
//! ## How lines are sorted
//!
//! - With explicit headers ("Ingredients", "Directions", "Notes") lines go to
//!   the list their header names.
//! - Without them, numbered lines and lines led by a cooking verb are steps,
//!   bullets and quantity-led lines are ingredients.
//! - Everything else is kept as prose rather than thrown away.
//!
//! ## Pure function guarantee
//!
//! No I/O, no state, no failure path. The same text and config always
//! produce the same [`ParseResult`]; text that is not a recipe produces empty
//! lists with confidence `0`.
//!
//! ```
//! use freeform::{parse, ParseMode};
//!
//! let result = parse("Best Eggs\nIngredients:\n- 2 eggs\n- salt\nInstructions:\n1. Crack eggs\n2. Cook in pan");
//! assert_eq!(result.title.as_deref(), Some("Best Eggs"));
//! assert_eq!(result.mode, ParseMode::Headers);
//! assert!(result.confidence > 0.7);
//! ```
mod classify;
mod config;
mod lines;
mod parser;
mod result;

pub use crate::config::{ConfigError, ParserConfig};
pub use crate::lines::{collapse_whitespace, split_lines};
pub use crate::parser::{parse, parse_with_config};
pub use crate::result::{ParseMode, ParseResult};
