//! Response normalization.
//!
//! The registry does not return one schema for data products: listings nest
//! `title`, `description` and `owner` under `info`, while search hits carry
//! `name`, `ownerId` and `ownerName` at the top level. A [`ShapePolicy`] maps
//! each output field to an ordered list of candidate paths; the first path
//! holding a non-empty value wins and [`NOT_AVAILABLE`] fills the rest.
//!
//! New upstream shapes are supported by editing the tables below, not the
//! resolution code.

use serde_json::{Map, Value};

/// Marker emitted for fields the registry did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// One flattened data product record.
pub type Record = Map<String, Value>;

/// Output field and the source paths tried for it, in priority order.
///
/// A path is a sequence of object keys, e.g. `&["info", "title"]`.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub output: &'static str,
    pub candidates: &'static [&'static [&'static str]],
}

/// A complete output shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapePolicy {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

/// Shape of `dataproduct_list` results.
pub const LIST_POLICY: ShapePolicy = ShapePolicy {
    name: "list",
    rules: &[
        FieldRule {
            output: "id",
            candidates: &[&["id"]],
        },
        FieldRule {
            output: "name",
            candidates: &[&["title"], &["info", "title"]],
        },
        FieldRule {
            output: "description",
            candidates: &[&["description"], &["info", "description"]],
        },
        FieldRule {
            output: "owner",
            candidates: &[&["owner"], &["info", "owner"]],
        },
    ],
};

/// Shape of `dataproduct_search` results. Owner stays split into id and name.
pub const SEARCH_POLICY: ShapePolicy = ShapePolicy {
    name: "search",
    rules: &[
        FieldRule {
            output: "id",
            candidates: &[&["id"]],
        },
        FieldRule {
            output: "name",
            candidates: &[&["name"], &["title"], &["info", "title"]],
        },
        FieldRule {
            output: "description",
            candidates: &[&["description"], &["info", "description"]],
        },
        FieldRule {
            output: "ownerId",
            candidates: &[&["ownerId"]],
        },
        FieldRule {
            output: "ownerName",
            candidates: &[&["ownerName"]],
        },
    ],
};

impl ShapePolicy {
    /// Output field names, in order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> {
        self.rules.iter().map(|rule| rule.output)
    }

    /// Flatten one raw record. Never fails.
    pub fn normalize(&self, raw: &Value) -> Record {
        self.rules
            .iter()
            .map(|rule| {
                let value = rule
                    .candidates
                    .iter()
                    .find_map(|path| lookup(raw, path))
                    .cloned()
                    .unwrap_or_else(|| Value::String(NOT_AVAILABLE.to_string()));
                (rule.output.to_string(), value)
            })
            .collect()
    }

    /// Flatten every record in a result list.
    pub fn normalize_all(&self, raw: &[Value]) -> Vec<Record> {
        raw.iter().map(|record| self.normalize(record)).collect()
    }
}

/// Follow `path` through nested objects; `None` if any step is missing or the
/// final value is empty.
fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
        .filter(|found| !is_empty(found))
}

/// `null`, blank strings, `[]` and `{}` count as absent.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
