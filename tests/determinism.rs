use serde_json::json;
use soustack::{
    compile, document_from_text, migrate_stacks, normalize_ingredients, normalize_instructions,
    parse, Document, InstructionItem, Stacks,
};

#[test]
fn parse_and_compile_are_repeatable() {
    let text = "Flatbread\n- 250g flour\n- 150ml water\n- pinch of salt\n1. Mix to a dough\n2. Cook in a dry pan";
    assert_eq!(parse(text), parse(text));
    assert_eq!(document_from_text(text), document_from_text(text));
}

#[test]
fn line_endings_do_not_change_the_parse() {
    let unix = "Soup\nIngredients\n- water\nMethod\n1. Boil";
    let windows = unix.replace('\n', "\r\n");
    let padded = unix.replace('\n', "\n\n   ");
    assert_eq!(parse(unix), parse(&windows));
    assert_eq!(parse(unix), parse(&padded));
}

#[test]
fn normalizing_normalized_lists_is_a_no_op() {
    let raw = json!([
        "salt",
        { "name": "flour", "quantity": "1 1/2", "unit": "cups", "sift": true },
        { "section": "Glaze", "items": ["icing sugar", ""] },
        { "section": { "name": "Filling", "items": [{ "name": "jam" }] } },
        42,
        null
    ]);
    let once = normalize_ingredients(&raw);
    let twice = normalize_ingredients(&serde_json::to_value(&once).expect("serialize"));
    assert_eq!(once, twice);

    let steps = json!([
        { "section": "Prep", "steps": ["Sift", { "text": "Whisk", "inputs": ["eggs"] }] },
        {
            "text": "Chill",
            "timing": {
                "activity": null,
                "duration": { "minutes": 30, "x-source": "fridge" },
                "completionCue": null
            }
        },
        { "text": "Glaze", "timing": { "duration": { "minMinutes": 5, "maxMinutes": 8, "minutes": 6 } } }
    ]);
    let once = normalize_instructions(&steps);
    let first = serde_json::to_value(&once).expect("serialize");
    let twice = normalize_instructions(&first);
    assert_eq!(once, twice);
    assert_eq!(first[1], steps[1]);
    assert_eq!(first[2], steps[2]);
}

#[test]
fn migration_is_idempotent_across_shapes() {
    let inputs = [
        json!({}),
        json!({ "timed": 1 }),
        json!({ "timed@1": true, "storage@1": null, "scaling@3": {} }),
        json!({ "prep@1": [{ "text": "a" }], "prep@2": [{ "text": "b" }] }),
        json!({ "prep@1": "free text", "x-future@9": [1, 2] }),
        json!({ "referenced@1": false }),
    ];
    for input in inputs {
        let stacks: Stacks = serde_json::from_value(input).expect("stack map");
        let once = migrate_stacks(&stacks).stacks.into_owned();
        let twice = migrate_stacks(&once);
        assert!(twice.is_unchanged(), "{once:?}");
        assert_eq!(twice.stacks.as_ref(), &once);
    }
}

#[test]
fn promoted_step_ids_are_stable() {
    let doc = compile(&json!({ "instructions": ["Knead", "Prove", "Bake"] }));
    let first = doc.clone().promote_instructions();
    let second = doc.promote_instructions();
    assert_eq!(first, second);

    let ids: Vec<_> = first
        .instructions
        .iter()
        .filter_map(|step| match step {
            InstructionItem::Structured(step) => step.id.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(ids.len(), 3);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn empty_document_is_the_compiled_fallback() {
    assert_eq!(Document::empty(), compile(&json!({})));
}
