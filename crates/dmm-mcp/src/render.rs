//! YAML rendering of full registry records.
//!
//! Single-entity lookups are returned as block-style YAML: keys keep the order
//! the registry sent them in and nested mappings and sequences are indented
//! rather than written inline.

use serde_json::Value;

/// Render a record as block-style YAML.
pub fn to_yaml(record: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(record)
}
