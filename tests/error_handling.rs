use serde_json::{json, Value};
use soustack::{
    compile, compute_mise_checks, document_from_text, infer_capabilities, normalize_document,
    parse, resolve_published, Capability, Document, DocumentError, Stacks, PLACEHOLDER,
};

fn odd_values() -> Vec<Value> {
    vec![
        Value::Null,
        json!(true),
        json!(-3.5),
        json!("just a string"),
        json!([]),
        json!([{ "name": 1 }]),
        json!({ "name": ["x"], "description": 5, "ingredients": {}, "instructions": "step" }),
        json!({ "ingredients": [[[]]], "instructions": [{ "section": 3 }] }),
        json!({ "ingredients": [{ "section": { "name": "A", "items": "no" } }] }),
        json!({ "stacks": "all", "extensions": [1], "profile": 9 }),
        json!({ "meta": { "confidence": -4, "mode": 1 } }),
    ]
}

#[test]
fn compile_and_normalize_never_fail() {
    for value in odd_values() {
        for doc in [compile(&value), normalize_document(&value)] {
            assert!(doc.check_invariants().is_ok(), "{value}");
            assert!(!doc.name.trim().is_empty());
            let _ = compute_mise_checks(&doc);
            let _ = infer_capabilities(&doc);
        }
    }
}

#[test]
fn negative_confidence_is_clamped() {
    let doc = compile(&json!({ "meta": { "confidence": -4, "mode": "markers" } }));
    let provenance = doc.extensions.provenance.expect("provenance");
    assert_eq!(provenance.confidence, 0.0);
}

#[test]
fn garbage_text_degrades_to_placeholder_document() {
    let oversized = "x".repeat(300_000);
    for text in ["", "   \n\t", "\u{0}\u{1}", "lorem ipsum dolor", oversized.as_str()] {
        let parsed = parse(text);
        assert!((0.0..=1.0).contains(&parsed.confidence));
        let doc = document_from_text(text);
        assert!(doc.check_invariants().is_ok());
    }
    let doc = document_from_text("");
    assert_eq!(serde_json::to_value(&doc.ingredients).expect("serialize"), json!([PLACEHOLDER]));
}

#[test]
fn strict_loader_reports_typed_errors() {
    let blank_name = r#"{"name":" ","ingredients":["a"],"instructions":["b"]}"#;
    assert!(matches!(Document::from_json_str(blank_name), Err(DocumentError::EmptyName)));

    let empty_list = r#"{"name":"x","ingredients":[],"instructions":["b"]}"#;
    assert!(matches!(
        Document::from_json_str(empty_list),
        Err(DocumentError::EmptyList("ingredients"))
    ));

    let foreign = r#"{"formatId":"other/format","name":"x","ingredients":["a"],"instructions":["b"]}"#;
    assert!(matches!(Document::from_json_str(foreign), Err(DocumentError::Json(_))));

    assert!(matches!(Document::from_json_str("not json"), Err(DocumentError::Json(_))));
}

#[test]
fn unknown_capability_name_is_an_error() {
    let err = "smoked".parse::<Capability>().expect_err("not a capability");
    assert!(matches!(err, DocumentError::UnknownCapability(name) if name == "smoked"));
}

#[test]
fn disable_leaves_legacy_keys_behind() {
    let legacy: Stacks = serde_json::from_value(json!({ "timed@1": { "unit": "min" } }))
        .expect("stack map");
    let enabled = legacy.enable(Capability::Timed);
    let disabled = enabled.disable(Capability::Timed);
    assert!(!disabled.is_declared(Capability::Timed));
    assert!(disabled.get("timed@1").is_some());
    assert!(disabled.is_enabled(Capability::Timed));
}

#[test]
fn unreadable_published_record_uses_fallback() {
    for stored in [Value::Null, json!("oops"), json!(12)] {
        assert_eq!(resolve_published(Some(&stored)), Some(compile(&json!({}))));
    }
    assert_eq!(resolve_published(None), None);
}
