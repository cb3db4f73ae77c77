//! The tools this server offers and their argument types.
//!
//! | Tool | Arguments | Returns |
//! |------|-----------|---------|
//! | `dataproduct_list` | `search_term?`, `archetype?`, `status?` | flattened records |
//! | `dataproduct_search` | `search_term` | flattened records |
//! | `dataproduct_get` | `data_product_id` | YAML text |
//! | `datacontract_get` | `data_contract_id` | YAML text |

use crate::protocol::{ToolAnnotations, ToolDefinition};
use serde::Deserialize;
use serde_json::json;

/// One of the registered tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataMeshTool {
    DataProductList,
    DataProductSearch,
    DataProductGet,
    DataContractGet,
}

impl DataMeshTool {
    /// Every tool, in registration order.
    pub const ALL: [DataMeshTool; 4] = [
        DataMeshTool::DataProductList,
        DataMeshTool::DataProductSearch,
        DataMeshTool::DataProductGet,
        DataMeshTool::DataContractGet,
    ];

    /// Wire name.
    pub fn name(self) -> &'static str {
        match self {
            DataMeshTool::DataProductList => "dataproduct_list",
            DataMeshTool::DataProductSearch => "dataproduct_search",
            DataMeshTool::DataProductGet => "dataproduct_get",
            DataMeshTool::DataContractGet => "datacontract_get",
        }
    }

    /// Look a tool up by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Prefix put in front of upstream failures for this tool.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            DataMeshTool::DataProductList => "Error fetching data products: ",
            DataMeshTool::DataProductSearch => "Error searching data products: ",
            DataMeshTool::DataProductGet => "Error fetching data product: ",
            DataMeshTool::DataContractGet => "Error fetching data contract: ",
        }
    }

    /// Text returned when a single-entity lookup finds nothing.
    pub fn not_found_message(self) -> Option<&'static str> {
        match self {
            DataMeshTool::DataProductGet => Some("Data product not found"),
            DataMeshTool::DataContractGet => Some("Data contract not found"),
            DataMeshTool::DataProductList | DataMeshTool::DataProductSearch => None,
        }
    }

    fn description(self) -> &'static str {
        match self {
            DataMeshTool::DataProductList => {
                "Lists all available Data Products. Returns the id, name, description and owner \
                 of each data product."
            }
            DataMeshTool::DataProductSearch => {
                "A semantic search for data products for a specific user question or use case."
            }
            DataMeshTool::DataProductGet => {
                "Get a data product by its ID. The data product contains all its output ports and \
                 server information. The response may include a data contract ID. You can use the \
                 datacontract_get tool to get the details of the data contract for more semantic \
                 information and terms of use."
            }
            DataMeshTool::DataContractGet => "Get a data contract by its ID.",
        }
    }

    fn input_schema(self) -> serde_json::Value {
        match self {
            DataMeshTool::DataProductList => json!({
                "type": "object",
                "properties": {
                    "search_term": {
                        "type": "string",
                        "description": "Search term to filter data products. Searches in the id, title, and description. Multiple search terms are supported, separated by space."
                    },
                    "archetype": {
                        "type": "string",
                        "description": "Filter for specific data product types. Typical values are: consumer-aligned, aggregate, source-aligned, application, dataconsumer"
                    },
                    "status": {
                        "type": "string",
                        "description": "Filter for specific status, such as active"
                    }
                }
            }),
            DataMeshTool::DataProductSearch => json!({
                "type": "object",
                "properties": {
                    "search_term": {
                        "type": "string",
                        "description": "Search term to filter data products. Searches in the id, title, and description. Use simple search terms."
                    }
                },
                "required": ["search_term"]
            }),
            DataMeshTool::DataProductGet => json!({
                "type": "object",
                "properties": {
                    "data_product_id": {
                        "type": "string",
                        "description": "The data product ID."
                    }
                },
                "required": ["data_product_id"]
            }),
            DataMeshTool::DataContractGet => json!({
                "type": "object",
                "properties": {
                    "data_contract_id": {
                        "type": "string",
                        "description": "The data contract ID."
                    }
                },
                "required": ["data_contract_id"]
            }),
        }
    }

    /// Protocol definition for `tools/list`.
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: Some(self.description().to_string()),
            input_schema: self.input_schema(),
            annotations: Some(ToolAnnotations {
                read_only_hint: Some(true),
                open_world_hint: Some(true),
                ..Default::default()
            }),
        }
    }
}

/// Arguments of `dataproduct_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListArgs {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Arguments of `dataproduct_search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchArgs {
    pub search_term: String,
}

/// Arguments of `dataproduct_get`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataProductArgs {
    pub data_product_id: String,
}

/// Arguments of `datacontract_get`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataContractArgs {
    pub data_contract_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for tool in DataMeshTool::ALL {
            assert_eq!(DataMeshTool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(DataMeshTool::from_name("dataproduct_delete"), None);
    }

    #[test]
    fn test_required_arguments_match_schema() {
        let required = |tool: DataMeshTool| tool.definition().input_schema["required"].clone();
        assert!(required(DataMeshTool::DataProductList).is_null());
        assert_eq!(required(DataMeshTool::DataProductSearch), json!(["search_term"]));
        assert_eq!(required(DataMeshTool::DataProductGet), json!(["data_product_id"]));
        assert_eq!(required(DataMeshTool::DataContractGet), json!(["data_contract_id"]));
    }

    #[test]
    fn test_all_tools_read_only() {
        for tool in DataMeshTool::ALL {
            let annotations = tool.definition().annotations.unwrap();
            assert_eq!(annotations.read_only_hint, Some(true));
        }
    }

    #[test]
    fn test_not_found_only_for_lookups() {
        assert_eq!(
            DataMeshTool::DataProductGet.not_found_message(),
            Some("Data product not found")
        );
        assert_eq!(DataMeshTool::DataProductList.not_found_message(), None);
    }

    #[test]
    fn test_search_args_require_search_term() {
        assert!(serde_json::from_value::<SearchArgs>(json!({})).is_err());
        assert!(serde_json::from_value::<ListArgs>(json!({})).is_ok());
    }
}
