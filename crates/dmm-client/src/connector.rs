//! Per-call client construction.
//!
//! Tools never hold a long-lived client. They ask a [`RegistryConnector`] for
//! a fresh one on every invocation, so configuration problems are reported on
//! each call instead of once at startup.

use crate::client::{Registry, RegistryClient};
use crate::error::RegistryError;
use dmm_core::RegistryConfig;
use std::sync::Arc;

/// Produces a [`Registry`] for a single tool invocation.
pub trait RegistryConnector: Send + Sync {
    /// Build a registry handle, or fail with [`RegistryError::Configuration`].
    fn connect(&self) -> Result<Arc<dyn Registry>, RegistryError>;
}

/// Connector that builds [`RegistryClient`]s from a shared configuration.
///
/// The underlying `reqwest::Client` is shared so connections are pooled; it
/// holds no per-call state.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl HttpConnector {
    /// Create a connector with a default HTTP client.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("datamesh-manager-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a connector around an existing HTTP client.
    pub fn with_http_client(config: RegistryConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// The configuration each client is built from.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl RegistryConnector for HttpConnector {
    fn connect(&self) -> Result<Arc<dyn Registry>, RegistryError> {
        let client = RegistryClient::new(&self.config, self.http.clone())?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_connect_without_api_key_fails_before_network() {
        let connector = HttpConnector::new(RegistryConfig {
            api_key_env: None,
            ..Default::default()
        })
        .unwrap();
        let err = connector.connect().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_connect_with_api_key() {
        let connector = HttpConnector::new(RegistryConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(connector.connect().is_ok());
    }
}
