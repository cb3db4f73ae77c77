//! Static prompts offered through `prompts/list` and `prompts/get`.

use crate::protocol::PromptDefinition;

/// Name of the workflow prompt.
pub const INITIAL_PROMPT_NAME: &str = "Initial Prompt";

/// Workflow instructions for agents using the data product tools.
pub const INITIAL_PROMPT: &str = r#"
You are now connected to the Data Mesh Manager through the Model Context Protocol (MCP).

Data Mesh Manager lists data products in the organization that you can use to get domain-specific data.

1. DISCOVERING DATA PRODUCTS
a) You can use the dataproduct_list tool to list data products in the organization.
   You can add filters to the dataproduct_list tool to filter data products by name, description, owner, and status.
b) Alternatively, you can use the dataproduct_search tool to search for data products by semantics search, where more information are indexed.

2. GETTING DATA PRODUCT DETAILS
  - Both tools above return the data product ID.
  - You can use the dataproduct_get tool to get the details of a data product.
  - A data product contains a list of output ports. An output port can be associated with a data contract.
  - The output port includes server information to physically access the data (e.g., Databricks, Snowflake, etc.)

3. WORKING WITH DATA CONTRACTS
  - If an output port links to a data contract, you can use the datacontract_get tool to get the details of the data contract.
  - A data contract contains the terms of use for accessing the data. You must adhere to the terms of use when accessing the data.
  - A data contract contains the schema of the data model. Use this schema to identify if the data product is suitable for your use case.
  - Use the schema if you later build queries (e.g., SQL) to access the data.
  - The data model also contains descriptions and other information about the data that you can use to understand the data."#;

/// A prompt with fixed text.
#[derive(Debug, Clone)]
pub struct StaticPrompt {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

impl StaticPrompt {
    /// Protocol definition for `prompts/list`.
    pub fn definition(&self) -> PromptDefinition {
        PromptDefinition {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            arguments: Vec::new(),
        }
    }
}

/// Prompts registered by the server, in listing order.
pub fn builtin_prompts() -> Vec<StaticPrompt> {
    vec![StaticPrompt {
        name: INITIAL_PROMPT_NAME,
        description: "How to discover data products, read their output ports and follow links to data contracts.",
        text: INITIAL_PROMPT,
    }]
}
