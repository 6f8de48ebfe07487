//! Error types produced by the model crate.
//!
//! Every transform in this crate is total. Errors only surface at the strict
//! edges: loading a document from JSON that must already be valid, exporting
//! it, and parsing capability names supplied by callers.
//!
//! ```rust
//! use model::DocumentError;
//!
//! let err = DocumentError::EmptyList("ingredients");
//! assert_eq!(err.to_string(), "document has no ingredients");
//! ```
use thiserror::Error;

/// Errors raised by the strict document surface.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocumentError {
    /// The input was not valid JSON or did not have the document shape.
    #[error("failed to parse document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The `name` field was blank after trimming.
    #[error("document name is empty")]
    EmptyName,

    /// One of the item lists was empty.
    #[error("document has no {0}")]
    EmptyList(&'static str),

    /// One of the item lists held only blank entries and was not the lone
    /// placeholder.
    #[error("document {0} hold only blank entries")]
    BlankList(&'static str),

    /// A `formatId` other than the Soustack one was supplied.
    #[error("unsupported format id `{0}`")]
    UnsupportedFormat(String),

    /// A capability name outside the fixed set.
    #[error("unknown capability `{0}`")]
    UnknownCapability(String),
}
