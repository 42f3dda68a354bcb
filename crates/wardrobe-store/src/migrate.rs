//! Schema migrations for persisted documents.
//!
//! Raw JSON is upgraded one version at a time through [`STEPS`] before it is
//! deserialized into a [`Document`]. Each step takes a document at version
//! `n` and rewrites it into the shape of version `n + 1`.

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::models::{Document, SCHEMA_VERSION};

type Step = fn(&mut Map<String, Value>);

/// Transform functions keyed by the version they upgrade from.
const STEPS: &[(u32, Step)] = &[(1, v1_to_v2)];

/// A document read from storage, brought up to [`SCHEMA_VERSION`].
#[derive(Debug, Clone)]
pub struct Upgraded {
    pub document: Document,
    /// Version the raw value was stored at.
    pub from_version: u32,
}

impl Upgraded {
    /// Whether the stored value differs from the current schema.
    pub fn changed(&self) -> bool {
        self.from_version != SCHEMA_VERSION
    }
}

/// Upgrade a raw persisted value to the current schema.
///
/// Fails when the value has no schema tag, when no migration path exists
/// from its version, or when the migrated value still does not match the
/// document shape.
pub fn upgrade(raw: Value) -> Result<Upgraded> {
    let Value::Object(mut obj) = raw else {
        return Err(StoreError::InvalidDocument("not a JSON object".to_string()));
    };

    let tag = obj
        .get("schema")
        .and_then(Value::as_u64)
        .ok_or_else(|| StoreError::InvalidDocument("missing schema tag".to_string()))?;
    let from_version = u32::try_from(tag)
        .map_err(|_| StoreError::InvalidDocument(format!("schema tag {} is out of range", tag)))?;

    let mut version = from_version;
    while version < SCHEMA_VERSION {
        let step = STEPS
            .iter()
            .find(|(from, _)| *from == version)
            .map(|(_, step)| *step)
            .ok_or_else(|| {
                StoreError::InvalidDocument(format!("no migration from schema {}", version))
            })?;
        step(&mut obj);
        info!(from = version, to = version + 1, "Migrated document schema");
        version += 1;
    }

    if version > SCHEMA_VERSION {
        warn!(
            stored = version,
            current = SCHEMA_VERSION,
            "Document was written by a newer schema; loading leniently"
        );
    }

    obj.insert("schema".to_string(), json!(SCHEMA_VERSION));
    let document: Document = serde_json::from_value(Value::Object(obj))?;

    Ok(Upgraded {
        document,
        from_version,
    })
}

/// v1 kept notes in one flat list tagged by mode and had no AI cache.
fn v1_to_v2(obj: &mut Map<String, Value>) {
    let notes = match obj.remove("notes") {
        Some(Value::Array(flat)) => {
            let mut inspiration = Vec::new();
            let mut lessons = Vec::new();
            for mut note in flat {
                let is_lesson = note.get("mode").and_then(Value::as_str) == Some("lesson");
                if let Value::Object(fields) = &mut note {
                    fields
                        .entry("mode")
                        .or_insert_with(|| json!("inspiration"));
                }
                if is_lesson {
                    lessons.push(note);
                } else {
                    inspiration.push(note);
                }
            }
            json!({ "inspiration": inspiration, "lessons": lessons })
        }
        Some(grouped @ Value::Object(_)) => grouped,
        _ => json!({ "inspiration": [], "lessons": [] }),
    };
    obj.insert("notes".to_string(), notes);

    obj.entry("lastAi")
        .or_insert_with(|| json!({ "vision": null, "stylist": null }));
}
