//! # dmm-client
//!
//! A thin client for the Data Mesh Manager REST API.
//!
//! Each method issues exactly one authenticated `GET` and returns the decoded
//! body. There is no caching and no retry; a failed call surfaces immediately
//! as a [`RegistryError`].
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`Registry::list_data_products`] | `GET /api/dataproducts` |
//! | [`Registry::search_data_products`] | `GET /api/search?resourceType=DATA_PRODUCT` |
//! | [`Registry::get_data_product`] | `GET /api/dataproducts/{id}` |
//! | [`Registry::get_data_contract`] | `GET /api/datacontracts/{id}` |
//!
//! Clients are cheap to build. The MCP tools build one per call through a
//! [`RegistryConnector`], so a missing API key is reported per call as
//! [`RegistryError::Configuration`] before any request is attempted.

pub mod client;
pub mod connector;
pub mod error;
pub mod types;

pub use client::{Registry, RegistryClient};
pub use connector::{HttpConnector, RegistryConnector};
pub use error::{ErrorKind, RegistryError};
pub use types::{ListFilter, SearchResponse, DATA_PRODUCT_RESOURCE_TYPE};
