//! Migration of legacy versioned stack keys.
//!
//! For every `name@version` key whose unversioned `name` is not declared:
//!
//! | Payload                                   | Result                                   |
//! |-------------------------------------------|------------------------------------------|
//! | sentinel (`1`, `true`, `null`, `{}`)      | replaced by the unversioned declaration  |
//! | `prep@v` holding a list of `{ text }`     | declaration + items relocated to `prepItems` |
//! | anything else                             | left under the legacy key                |
//!
//! When nothing changes the input is handed back borrowed
//! ([`Cow::Borrowed`]), which callers use to decide whether to persist.
//! Running a migration on its own output changes nothing.
use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::capability::Capability;
use crate::document::Document;
use crate::extensions::{PrepItem, PREP_ITEMS_KEY};
use crate::stacks::{StackKey, Stacks};

/// Outcome of [`migrate_stacks`].
#[derive(Debug, Clone, PartialEq)]
pub struct StackMigration<'a> {
    pub stacks: Cow<'a, Stacks>,
    /// Items lifted out of a legacy `prep@v` payload, destined for
    /// `extensions.prepItems`.
    pub relocated_prep_items: Vec<PrepItem>,
}

impl StackMigration<'_> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self.stacks, Cow::Borrowed(_))
    }
}

enum LegacyPayload {
    Sentinel,
    PrepItems(Vec<PrepItem>),
    Unrecognized,
}

fn classify(capability: Capability, payload: &Value, relocate_prep: bool) -> LegacyPayload {
    match payload {
        Value::Null | Value::Bool(true) => return LegacyPayload::Sentinel,
        Value::Number(n) if n.as_f64() == Some(1.0) => return LegacyPayload::Sentinel,
        Value::Object(map) if map.is_empty() => return LegacyPayload::Sentinel,
        _ => {}
    }
    if capability == Capability::Prep && relocate_prep && payload.is_array() {
        if let Ok(items) = serde_json::from_value::<Vec<PrepItem>>(payload.clone()) {
            return LegacyPayload::PrepItems(items);
        }
    }
    LegacyPayload::Unrecognized
}

/// Migrates legacy keys of a stack map.
pub fn migrate_stacks(stacks: &Stacks) -> StackMigration<'_> {
    migrate_with(stacks, true)
}

fn migrate_with(stacks: &Stacks, relocate_prep: bool) -> StackMigration<'_> {
    let mut migrated: Option<Stacks> = None;
    let mut relocated_prep_items = Vec::new();

    for (key, payload) in stacks.iter() {
        let StackKey::Legacy {
            capability,
            version,
        } = StackKey::parse(key)
        else {
            continue;
        };
        if migrated.as_ref().unwrap_or(stacks).is_declared(capability) {
            continue;
        }
        match classify(capability, payload, relocate_prep) {
            LegacyPayload::Sentinel => {
                debug!(capability = %capability, version, "stack_migration_applied");
            }
            LegacyPayload::PrepItems(items) => {
                debug!(
                    capability = %capability,
                    version,
                    relocated = items.len(),
                    "stack_migration_applied"
                );
                relocated_prep_items.extend(items);
            }
            LegacyPayload::Unrecognized => {
                debug!(capability = %capability, version, "stack_migration_deferred");
                continue;
            }
        }
        migrated
            .get_or_insert_with(|| stacks.clone())
            .replace_legacy(key, capability);
    }

    StackMigration {
        stacks: migrated.map_or(Cow::Borrowed(stacks), Cow::Owned),
        relocated_prep_items,
    }
}

/// Migrates a document's stacks and moves relocated payloads into their
/// canonical fields. Borrowed when nothing changes.
///
/// Relocated prep items are appended after any prep items already present.
/// If `extensions.prepItems` holds something unreadable, legacy prep payloads
/// stay where they are rather than overwrite it.
pub fn migrate_document(doc: &Document) -> Cow<'_, Document> {
    let relocate_prep = !doc.extensions.has_unreadable(PREP_ITEMS_KEY);
    let StackMigration {
        stacks,
        relocated_prep_items,
    } = migrate_with(&doc.stacks, relocate_prep);
    match stacks {
        Cow::Borrowed(_) => Cow::Borrowed(doc),
        Cow::Owned(stacks) => {
            let mut next = doc.clone();
            next.stacks = stacks;
            next.extensions.prep_items.extend(relocated_prep_items);
            Cow::Owned(next)
        }
    }
}
