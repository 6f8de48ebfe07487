//! Read-only projections from a document's content onto its capabilities.
//!
//! - [`compute_mise_checks`] walks the *declared* capabilities and reports
//!   where the matching content is missing or incomplete.
//! - [`infer_capabilities`] goes the other way and derives capabilities from
//!   content shape alone; [`suggest_capabilities`] narrows that to the ones
//!   not yet enabled.
//!
//! Nothing here mutates a document. Turning a suggestion into a declaration
//! is the caller's decision (`Document::with_capability`).
mod checks;
mod inference;

pub use crate::checks::{compute_mise_checks, MiseCheck, Severity};
pub use crate::inference::{infer_capabilities, infer_stacks, suggest_capabilities};
