use std::time::Instant;

use model::{
    clean_name, migrate_document, normalize_ingredients, normalize_instructions, Document,
    Extensions, FormatId, Profile, Provenance, Stacks,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::CompilerConfig;
use crate::seed::{LiteSeed, ParseMeta};

/// Compiles any JSON value into a valid document.
///
/// ```
/// use serde_json::json;
///
/// let doc = compiler::compile(&json!({}));
/// assert_eq!(doc.name, "Untitled Recipe");
/// assert_eq!(serde_json::to_value(&doc.ingredients).unwrap(), json!(["(not provided)"]));
/// ```
pub fn compile(input: &Value) -> Document {
    compile_seed(LiteSeed::from_value(input))
}

/// Compiles a typed seed with the default [`CompilerConfig`].
pub fn compile_seed(seed: LiteSeed) -> Document {
    compile_seed_with_config(seed, &CompilerConfig::default())
}

/// Assembles a document from a seed. Every field is either taken from the
/// seed after cleanup or defaulted, so the result always satisfies the
/// document invariants. Stacks are always empty: declarations are the
/// caller's to carry over.
pub fn compile_seed_with_config(seed: LiteSeed, config: &CompilerConfig) -> Document {
    let started = Instant::now();

    let ingredients = normalize_ingredients(&seed.ingredients);
    let instructions = normalize_instructions(&seed.instructions);

    let mut extensions = Extensions::default();
    if config.record_provenance {
        extensions.provenance = seed
            .meta
            .map(|meta| provenance(meta, &config.provenance_source));
    }
    extensions.prose = seed
        .prose
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let doc = Document {
        format_id: FormatId,
        profile: Profile::Lite,
        name: clean_name(seed.name.as_deref().unwrap_or_default()),
        description: seed
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        ingredients,
        instructions,
        stacks: Stacks::new(),
        extensions,
    };

    debug!(
        ingredients = doc.ingredients.len(),
        instructions = doc.instructions.len(),
        provenance = doc.extensions.provenance.is_some(),
        elapsed_micros = started.elapsed().as_micros() as u64,
        "compile_complete"
    );
    doc
}

fn provenance(meta: ParseMeta, default_source: &str) -> Provenance {
    let confidence = if meta.confidence.is_nan() {
        0.0
    } else {
        meta.confidence.clamp(0.0, 1.0)
    };
    Provenance {
        source: meta
            .source
            .filter(|source| !source.trim().is_empty())
            .unwrap_or_else(|| default_source.to_string()),
        confidence,
        mode: meta.mode,
    }
}

/// Extension key holding stored `stacks` / `extensions` values that were not
/// JSON objects, keyed by the field they came from.
pub const RECOVERED_KEY: &str = "recovered";

/// Lenient loader for stored documents.
///
/// Content fields are recompiled; `stacks`, `extensions`, `profile` and
/// `description` are carried over when readable, then legacy stack keys are
/// migrated. Anything unreadable falls back to the compiled defaults, so
/// this never fails. A `stacks` or `extensions` value that is present but
/// not an object is kept under `extensions.recovered.<field>`; a `profile`
/// outside the known set is dropped.
pub fn normalize_document(stored: &Value) -> Document {
    let Value::Object(fields) = stored else {
        debug!("stored_document_not_an_object");
        return compile(&Value::Null);
    };

    let seed = LiteSeed {
        meta: None,
        prose: Vec::new(),
        ..LiteSeed::from_value(stored)
    };
    let mut doc = compile_seed(seed);

    if let Some(profile) = fields
        .get("profile")
        .and_then(|value| serde_json::from_value::<Profile>(value.clone()).ok())
    {
        doc.profile = profile;
    }
    let mut recovered = Map::new();
    match fields.get("stacks") {
        Some(Value::Object(stacks)) => doc.stacks = Stacks::from_map(stacks.clone()),
        Some(Value::Null) | None => {}
        Some(other) => {
            recovered.insert("stacks".into(), other.clone());
        }
    }
    match fields.get("extensions") {
        Some(extensions @ Value::Object(_)) => doc.extensions = Extensions::from_value(extensions),
        Some(Value::Null) | None => {}
        Some(other) => {
            recovered.insert("extensions".into(), other.clone());
        }
    }
    if !recovered.is_empty() {
        debug!(fields = recovered.len(), "stored_fields_recovered");
        keep_recovered(&mut doc.extensions, recovered);
    }

    migrate_document(&doc).into_owned()
}

fn keep_recovered(extensions: &mut Extensions, recovered: Map<String, Value>) {
    match extensions.other.get_mut(RECOVERED_KEY) {
        Some(Value::Object(existing)) => existing.extend(recovered),
        Some(_) => {}
        None => {
            extensions
                .other
                .insert(RECOVERED_KEY.into(), Value::Object(recovered));
        }
    }
}
