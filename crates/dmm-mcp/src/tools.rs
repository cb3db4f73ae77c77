//! Tool registry for MCP tools.
//!
//! Tools are listed in the order they were registered. Registering a name a
//! second time replaces the earlier definition in place.

use crate::catalog::DataMeshTool;
use crate::protocol::ToolDefinition;

/// Registry of available MCP tools.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding every data mesh tool.
    pub fn with_data_mesh_tools() -> Self {
        let mut registry = Self::new();
        for tool in DataMeshTool::ALL {
            registry.register(tool.definition());
        }
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: ToolDefinition) {
        match self.tools.iter_mut().find(|t| t.name == tool.name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// List all tools.
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_tool(name: &str, description: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_string(),
            description: Some(description.to_string()),
            input_schema: json!({"type": "object"}),
            annotations: None,
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(create_test_tool("test", "first"));

        assert!(registry.get("test").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_registration_order_kept() {
        let mut registry = ToolRegistry::new();
        registry.register(create_test_tool("zeta", ""));
        registry.register(create_test_tool("alpha", ""));
        registry.register(create_test_tool("mid", ""));

        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(create_test_tool("a", "old"));
        registry.register(create_test_tool("b", ""));
        registry.register(create_test_tool("a", "new"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().description.as_deref(), Some("new"));
    }

    #[test]
    fn test_data_mesh_tools() {
        let registry = ToolRegistry::with_data_mesh_tools();
        assert_eq!(
            registry.names(),
            vec![
                "dataproduct_list",
                "dataproduct_search",
                "dataproduct_get",
                "datacontract_get"
            ]
        );
        assert!(registry.contains("datacontract_get"));
        assert!(!registry.is_empty());
    }
}
