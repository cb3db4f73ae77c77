//! # dmm-mcp
//!
//! MCP (Model Context Protocol) server exposing the Data Mesh Manager catalog
//! to AI agents.
//!
//! Four read-only tools are offered:
//!
//! - `dataproduct_list` - list data products, optionally filtered
//! - `dataproduct_search` - semantic search over data products
//! - `dataproduct_get` - one data product as YAML
//! - `datacontract_get` - one data contract as YAML
//!
//! plus a single prompt, `Initial Prompt`, describing how an agent should
//! move from discovery to product details to contract terms.
//!
//! List and search results are flattened into uniform records by the
//! [`normalize`] tables. Registry failures never escape a tool; they come back
//! as an error record or an error string with `isError` set.

pub mod adapter;
pub mod catalog;
pub mod error;
pub mod normalize;
pub mod prompts;
pub mod protocol;
pub mod render;
pub mod server;
pub mod tools;
pub mod transport;

pub use adapter::DataMeshTools;
pub use catalog::DataMeshTool;
pub use error::McpError;
pub use normalize::{Record, ShapePolicy, LIST_POLICY, NOT_AVAILABLE, SEARCH_POLICY};
pub use server::McpServer;
pub use tools::ToolRegistry;
pub use transport::StdioTransport;
