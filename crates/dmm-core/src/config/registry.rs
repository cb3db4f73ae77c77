//! Remote registry connection settings.
//!
//! The API key and base URL can each come from two places, in order of
//! precedence:
//! 1. An environment variable (`api_key_env` / `base_url_env`)
//! 2. A value written directly in the configuration file
//!
//! The base URL falls back to the public Data Mesh Manager API. The API key
//! has no fallback; a missing key is reported by the client on first use.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the Data Mesh Manager API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the registry API, without the `/api` suffix.
    #[serde(default = "default_base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable holding the base URL. Takes precedence over `base_url`.
    #[serde(default = "default_base_url_env", skip_serializing_if = "Option::is_none")]
    pub base_url_env: Option<String>,

    /// API key. Prefer `api_key_env` so secrets stay out of config files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key. Takes precedence over `api_key`.
    #[serde(default = "default_api_key_env", skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// How the API key is attached to requests.
    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

/// How the credential is attached to outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    #[default]
    Bearer,
    /// `x-api-key: <key>`.
    ApiKey,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            base_url_env: default_base_url_env(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
            auth_scheme: AuthScheme::default(),
        }
    }
}

impl RegistryConfig {
    /// Replace `api_key` and `base_url` with the values of their environment
    /// variables, when those are set and non-empty.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(name) = &self.api_key_env
            && let Some(value) = lookup(name).filter(|v| !v.trim().is_empty())
        {
            self.api_key = Some(value);
        }
        if let Some(name) = &self.base_url_env
            && let Some(value) = lookup(name).filter(|v| !v.trim().is_empty())
        {
            self.base_url = Some(value);
        }
        self
    }

    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    /// The base URL with any trailing slash removed, if configured and non-blank.
    pub fn base_url(&self) -> Option<&str> {
        non_blank(self.base_url.as_deref()).map(|url| url.trim_end_matches('/'))
    }

    /// Name of the variable a user should set to provide the API key.
    pub fn api_key_source(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or("registry.api_key")
    }

    /// Name of the variable a user should set to provide the base URL.
    pub fn base_url_source(&self) -> &str {
        self.base_url_env.as_deref().unwrap_or("registry.base_url")
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// Default value functions
fn default_base_url() -> Option<String> {
    Some("https://api.datamesh-manager.com".to_string())
}

fn default_base_url_env() -> Option<String> {
    Some("DATAMESH_MANAGER_HOST".to_string())
}

fn default_api_key_env() -> Option<String> {
    Some("DATAMESH_MANAGER_API_KEY".to_string())
}

fn default_timeout_seconds() -> u64 {
    30
}
