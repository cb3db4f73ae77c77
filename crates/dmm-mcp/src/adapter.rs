//! Tool operations over the registry.
//!
//! Every operation returns a value: registry failures, missing configuration
//! and not-found outcomes are folded into the tool output instead of being
//! raised. List-style tools report failures as a single `{"error": ...}`
//! record; lookup tools report them as plain text.

use crate::catalog::{DataContractArgs, DataMeshTool, DataProductArgs, ListArgs, SearchArgs};
use crate::error::McpError;
use crate::normalize::{Record, LIST_POLICY, SEARCH_POLICY};
use crate::protocol::{CallToolResponse, ToolContent};
use crate::render;
use dmm_client::{ErrorKind, ListFilter, Registry, RegistryConnector, RegistryError};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

/// Single-record endpoints behind the lookup tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    DataProduct,
    DataContract,
}

impl Lookup {
    fn tool(self) -> DataMeshTool {
        match self {
            Lookup::DataProduct => DataMeshTool::DataProductGet,
            Lookup::DataContract => DataMeshTool::DataContractGet,
        }
    }
}

/// The data mesh tools, bound to a way of reaching the registry.
#[derive(Clone)]
pub struct DataMeshTools {
    connector: Arc<dyn RegistryConnector>,
}

impl DataMeshTools {
    pub fn new(connector: Arc<dyn RegistryConnector>) -> Self {
        Self { connector }
    }

    /// `dataproduct_list`: flattened data products matching the filters.
    pub async fn list_data_products(&self, args: &ListArgs) -> Vec<Record> {
        self.try_list(args).await.unwrap_or_else(error_records)
    }

    /// `dataproduct_search`: flattened semantic search hits.
    pub async fn search_data_products(&self, args: &SearchArgs) -> Vec<Record> {
        self.try_search(args).await.unwrap_or_else(error_records)
    }

    /// `dataproduct_get`: the full data product as YAML.
    pub async fn get_data_product(&self, args: &DataProductArgs) -> String {
        self.try_get(Lookup::DataProduct, &args.data_product_id)
            .await
            .unwrap_or_else(|message| message)
    }

    /// `datacontract_get`: the full data contract as YAML.
    pub async fn get_data_contract(&self, args: &DataContractArgs) -> String {
        self.try_get(Lookup::DataContract, &args.data_contract_id)
            .await
            .unwrap_or_else(|message| message)
    }

    /// Dispatch a `tools/call` by tool name.
    ///
    /// Only unknown tools and undecodable arguments are errors; every other
    /// outcome is a [`CallToolResponse`], with `is_error` set on failure.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<CallToolResponse, McpError> {
        let tool = DataMeshTool::from_name(name).ok_or_else(|| McpError::ToolNotFound {
            name: name.to_string(),
        })?;

        match tool {
            DataMeshTool::DataProductList => {
                let args: ListArgs = parse_arguments(tool, arguments)?;
                records_response(self.try_list(&args).await)
            }
            DataMeshTool::DataProductSearch => {
                let args: SearchArgs = parse_arguments(tool, arguments)?;
                records_response(self.try_search(&args).await)
            }
            DataMeshTool::DataProductGet => {
                let args: DataProductArgs = parse_arguments(tool, arguments)?;
                Ok(text_response(self.try_get(Lookup::DataProduct, &args.data_product_id).await))
            }
            DataMeshTool::DataContractGet => {
                let args: DataContractArgs = parse_arguments(tool, arguments)?;
                Ok(text_response(self.try_get(Lookup::DataContract, &args.data_contract_id).await))
            }
        }
    }

    async fn try_list(&self, args: &ListArgs) -> Result<Vec<Record>, String> {
        let tool = DataMeshTool::DataProductList;
        tracing::info!(
            tool = tool.name(),
            search_term = ?args.search_term,
            archetype = ?args.archetype,
            status = ?args.status,
            "Listing data products"
        );

        let filter = ListFilter {
            search: args.search_term.clone(),
            archetype: args.archetype.clone(),
            status: args.status.clone(),
        };
        let registry = self.connect(tool)?;
        let products = registry
            .list_data_products(&filter)
            .await
            .map_err(|e| failure(tool, &e))?;

        if products.is_empty() {
            tracing::info!(tool = tool.name(), "No data products found");
            return Ok(Vec::new());
        }

        let records = LIST_POLICY.normalize_all(&products);
        tracing::info!(tool = tool.name(), count = records.len(), "Listed data products");
        Ok(records)
    }

    async fn try_search(&self, args: &SearchArgs) -> Result<Vec<Record>, String> {
        let tool = DataMeshTool::DataProductSearch;
        tracing::info!(tool = tool.name(), search_term = %args.search_term, "Searching data products");

        let registry = self.connect(tool)?;
        let response = registry
            .search_data_products(&args.search_term)
            .await
            .map_err(|e| failure(tool, &e))?;

        if response.results.is_empty() {
            tracing::info!(tool = tool.name(), search_term = %args.search_term, "No search results");
            return Ok(Vec::new());
        }

        let records = SEARCH_POLICY.normalize_all(&response.results);
        tracing::info!(tool = tool.name(), count = records.len(), "Search returned data products");
        Ok(records)
    }

    async fn try_get(&self, lookup: Lookup, id: &str) -> Result<String, String> {
        let tool = lookup.tool();
        tracing::info!(tool = tool.name(), id = %id, "Fetching record");

        let registry = self.connect(tool)?;
        let found = match lookup {
            Lookup::DataProduct => registry.get_data_product(id).await,
            Lookup::DataContract => registry.get_data_contract(id).await,
        }
        .map_err(|e| failure(tool, &e))?;

        let Some(record) = found else {
            tracing::info!(tool = tool.name(), id = %id, "Record not found");
            return Ok(tool.not_found_message().unwrap_or_default().to_string());
        };

        render::to_yaml(&record).map_err(|e| {
            tracing::error!(tool = tool.name(), id = %id, error = %e, "Failed to render record as YAML");
            format!("{}{}", tool.failure_prefix(), e)
        })
    }

    fn connect(&self, tool: DataMeshTool) -> Result<Arc<dyn Registry>, String> {
        self.connector.connect().map_err(|e| failure(tool, &e))
    }
}

/// Log a registry failure and turn it into the message the caller sees.
fn failure(tool: DataMeshTool, err: &RegistryError) -> String {
    match err.kind() {
        ErrorKind::Configuration => {
            tracing::error!(tool = tool.name(), error = %err, "Registry is not configured");
            err.to_string()
        }
        ErrorKind::Upstream => {
            tracing::error!(
                tool = tool.name(),
                status = ?err.status(),
                error = %err,
                "Registry request failed"
            );
            format!("{}{}", tool.failure_prefix(), err)
        }
    }
}

fn error_records(message: String) -> Vec<Record> {
    let mut record = Record::new();
    record.insert("error".to_string(), Value::String(message));
    vec![record]
}

fn parse_arguments<T: DeserializeOwned>(tool: DataMeshTool, arguments: Value) -> Result<T, McpError> {
    // Clients may omit `arguments` entirely for tools without required fields.
    let arguments = match arguments {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidArguments {
        tool: tool.name().to_string(),
        reason: e.to_string(),
    })
}

fn records_response(outcome: Result<Vec<Record>, String>) -> Result<CallToolResponse, McpError> {
    let is_error = outcome.is_err();
    let records = outcome.unwrap_or_else(error_records);
    let text = serde_json::to_string_pretty(&records)?;
    Ok(CallToolResponse {
        content: vec![ToolContent::text(text)],
        structured_content: Some(json!({ "result": records })),
        is_error,
    })
}

fn text_response(outcome: Result<String, String>) -> CallToolResponse {
    let is_error = outcome.is_err();
    let text = outcome.unwrap_or_else(|message| message);
    CallToolResponse {
        content: vec![ToolContent::text(text)],
        structured_content: None,
        is_error,
    }
}
