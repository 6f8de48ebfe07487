//! Soustack Lite compiler.
//!
//! The single choke point for the always-valid guarantee: whatever arrives
//! (a parser seed, a form submission, a record read back from storage) goes
//! out as a [`model::Document`] with a non-blank name and non-empty
//! ingredient and instruction lists.
//!
//! - [`compile`] / [`compile_seed`] build a fresh document; they never
//!   declare capabilities.
//! - [`normalize_document`] reloads a stored document, keeping its stacks and
//!   extensions and migrating legacy stack keys.
//!
//! Neither path returns an error.
mod compile;
mod config;
mod seed;

pub use crate::compile::{
    compile, compile_seed, compile_seed_with_config, normalize_document, RECOVERED_KEY,
};
pub use crate::config::{CompilerConfig, ConfigError};
pub use crate::seed::{LiteSeed, ParseMeta};
