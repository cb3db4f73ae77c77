//! Request and response types for the registry API.

use crate::error::RegistryError;
use serde_json::{Map, Value};

/// Resource type sent with every semantic search.
pub const DATA_PRODUCT_RESOURCE_TYPE: &str = "DATA_PRODUCT";

/// Optional filters for listing data products.
///
/// Blank filters are treated as absent and never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Free-text search over id, title and description.
    pub search: Option<String>,
    /// Data product archetype, e.g. `source-aligned`.
    pub archetype: Option<String>,
    /// Lifecycle status, e.g. `active`.
    pub status: Option<String>,
}

impl ListFilter {
    /// Query parameters for the non-blank filters, in a fixed order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", self.search.as_deref()),
            ("archetype", self.archetype.as_deref()),
            ("status", self.status.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}

/// A semantic search response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Matching records.
    pub results: Vec<Value>,
    /// Everything else the registry sent alongside `results` (paging, totals).
    pub metadata: Map<String, Value>,
}

impl SearchResponse {
    /// Split a raw search body into results and metadata.
    ///
    /// A bare array is accepted as the result list.
    pub fn from_body(body: Value) -> Result<Self, RegistryError> {
        match body {
            Value::Null => Ok(Self::default()),
            Value::Array(results) => Ok(Self {
                results,
                metadata: Map::new(),
            }),
            Value::Object(mut metadata) => {
                let results = match metadata.remove("results") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(results)) => results,
                    Some(other) => {
                        return Err(RegistryError::Decode(format!(
                            "expected `results` to be an array, got {}",
                            type_name(&other)
                        )));
                    }
                };
                Ok(Self { results, metadata })
            }
            other => Err(RegistryError::Decode(format!(
                "expected a search result object, got {}",
                type_name(&other)
            ))),
        }
    }
}

/// Extract the record list from a listing body.
///
/// Accepts a bare array, or an object wrapping the array under `results` or
/// `content` (paged listings).
pub(crate) fn records_from_list_body(body: Value) -> Result<Vec<Value>, RegistryError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => {
            for key in ["results", "content"] {
                if let Some(Value::Array(records)) = map.remove(key) {
                    return Ok(records);
                }
            }
            Err(RegistryError::Decode(
                "expected an array of data products".to_string(),
            ))
        }
        other => Err(RegistryError::Decode(format!(
            "expected an array of data products, got {}",
            type_name(&other)
        ))),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
