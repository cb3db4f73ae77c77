//! HTTP implementation of the registry API.

use crate::error::RegistryError;
use crate::types::{
    records_from_list_body, type_name, ListFilter, SearchResponse, DATA_PRODUCT_RESOURCE_TYPE,
};
use async_trait::async_trait;
use dmm_core::{AuthScheme, RegistryConfig};
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Longest upstream error message passed through to callers.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Read access to the data product catalog.
#[async_trait]
pub trait Registry: Send + Sync {
    /// List data products, optionally filtered.
    async fn list_data_products(&self, filter: &ListFilter) -> Result<Vec<Value>, RegistryError>;

    /// Semantic search restricted to data products.
    async fn search_data_products(&self, query: &str) -> Result<SearchResponse, RegistryError>;

    /// Fetch one data product. `Ok(None)` when the registry does not know the id.
    async fn get_data_product(&self, id: &str) -> Result<Option<Value>, RegistryError>;

    /// Fetch one data contract. `Ok(None)` when the registry does not know the id.
    async fn get_data_contract(&self, id: &str) -> Result<Option<Value>, RegistryError>;
}

/// Registry client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    auth_scheme: AuthScheme,
    timeout: Duration,
}

impl RegistryClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`RegistryError::Configuration`] when the API key or base URL
    /// is missing, or the base URL is not an absolute `http(s)` URL.
    pub fn new(config: &RegistryConfig, http: reqwest::Client) -> Result<Self, RegistryError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| RegistryError::missing_api_key(config.api_key_source()))?;
        let raw_url = config
            .base_url()
            .ok_or_else(|| RegistryError::missing_base_url(config.base_url_source()))?;

        let base_url = Url::parse(raw_url).map_err(|e| RegistryError::invalid_base_url(raw_url, e))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(RegistryError::invalid_base_url(
                raw_url,
                "expected an http or https URL",
            ));
        }

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
            auth_scheme: config.auth_scheme,
            timeout: config.timeout(),
        })
    }

    /// The registry base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/api/{segments...}`. Each segment is percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// URL of one entity in `collection`, or `None` when `id` cannot name a
    /// single path segment (`.` and `..` are collapsed by URL normalization).
    fn entity_endpoint(&self, collection: &str, id: &str) -> Option<Url> {
        if matches!(id, "." | "..") {
            tracing::debug!(collection, id, "dot-segment id treated as not found");
            return None;
        }
        Some(self.endpoint(&[collection, id]))
    }

    /// Issue one GET. Returns `Ok(None)` on 404.
    async fn get_json(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Option<Value>, RegistryError> {
        tracing::debug!(url = %url, params = query.len(), "registry request");

        let request = self
            .http
            .get(url.clone())
            .query(query)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout);
        let request = match self.auth_scheme {
            AuthScheme::Bearer => request.bearer_auth(&self.api_key),
            AuthScheme::ApiKey => request.header("x-api-key", &self.api_key),
        };

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(url = %url, "registry returned 404");
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "registry request failed");
            return Err(RegistryError::Status {
                status: status.as_u16(),
                message: upstream_message(status, &body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Some(Value::Null));
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| RegistryError::Decode(e.to_string()))
    }

    /// GET a collection endpoint, where 404 is a failure rather than an empty result.
    async fn get_collection(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Value, RegistryError> {
        let path = url.path().to_string();
        self.get_json(url, query)
            .await?
            .ok_or_else(|| RegistryError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: format!("endpoint {path} not found"),
            })
    }

    /// GET a single entity. 404, `null` and `{}` all mean "not found".
    async fn get_entity(&self, url: Option<Url>) -> Result<Option<Value>, RegistryError> {
        let Some(url) = url else {
            return Ok(None);
        };
        match self.get_json(url, &[]).await? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(entity @ Value::Object(_)) => Ok(Some(entity)),
            Some(other) => Err(RegistryError::Decode(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> RegistryError {
        if err.is_timeout() {
            RegistryError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_decode() {
            RegistryError::Decode(err.to_string())
        } else {
            RegistryError::Transport(error_chain(&err))
        }
    }
}

#[async_trait]
impl Registry for RegistryClient {
    async fn list_data_products(&self, filter: &ListFilter) -> Result<Vec<Value>, RegistryError> {
        let url = self.endpoint(&["dataproducts"]);
        let body = self.get_collection(url, &filter.query_pairs()).await?;
        records_from_list_body(body)
    }

    async fn search_data_products(&self, query: &str) -> Result<SearchResponse, RegistryError> {
        let url = self.endpoint(&["search"]);
        let params = [("query", query), ("resourceType", DATA_PRODUCT_RESOURCE_TYPE)];
        let body = self.get_collection(url, &params).await?;
        SearchResponse::from_body(body)
    }

    async fn get_data_product(&self, id: &str) -> Result<Option<Value>, RegistryError> {
        self.get_entity(self.entity_endpoint("dataproducts", id)).await
    }

    async fn get_data_contract(&self, id: &str) -> Result<Option<Value>, RegistryError> {
        self.get_entity(self.entity_endpoint("datacontracts", id)).await
    }
}

/// Pick a human-readable message out of an error body.
fn upstream_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["message", "error", "detail", "title"]
            .into_iter()
            .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    truncate(message, MAX_ERROR_MESSAGE_LEN)
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push('…');
    }
    text
}

/// `reqwest` errors hide the useful part (DNS, refused connection) in their sources.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, base_url: Option<&str>) -> RegistryConfig {
        RegistryConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let err = RegistryClient::new(&config(None, Some("https://x.test")), reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(_)));
        assert!(err.to_string().contains("DATAMESH_MANAGER_API_KEY"));
    }

    #[test]
    fn test_missing_base_url_is_configuration_error() {
        let err = RegistryClient::new(&config(Some("key"), Some("  ")), reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(_)));
        assert!(err.to_string().contains("DATAMESH_MANAGER_HOST"));
    }

    #[test]
    fn test_invalid_base_url_is_configuration_error() {
        for url in ["not a url", "ftp://x.test", "mailto:team@x.test"] {
            let err = RegistryClient::new(&config(Some("key"), Some(url)), reqwest::Client::new())
                .unwrap_err();
            assert!(matches!(err, RegistryError::Configuration(_)), "{url}");
        }
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = RegistryClient::new(
            &config(Some("key"), Some("https://x.test/prefix")),
            reqwest::Client::new(),
        )
        .unwrap();
        let url = client.endpoint(&["dataproducts", "a/b c"]);
        assert_eq!(url.as_str(), "https://x.test/prefix/api/dataproducts/a%2Fb%20c");
    }

    #[test]
    fn test_entity_endpoint_rejects_dot_segments() {
        let client = RegistryClient::new(
            &config(Some("key"), Some("https://x.test")),
            reqwest::Client::new(),
        )
        .unwrap();
        assert!(client.entity_endpoint("dataproducts", "..").is_none());
        assert!(client.entity_endpoint("datacontracts", ".").is_none());
        assert_eq!(
            client.entity_endpoint("dataproducts", "...").unwrap().as_str(),
            "https://x.test/api/dataproducts/..."
        );
    }

    #[test]
    fn test_endpoint_without_prefix() {
        let client = RegistryClient::new(
            &config(Some("key"), Some("https://x.test")),
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(&["search"]).as_str(),
            "https://x.test/api/search"
        );
    }

    #[test]
    fn test_upstream_message_prefers_json_field() {
        let message = upstream_message(
            StatusCode::BAD_REQUEST,
            r#"{"message": "invalid status filter"}"#,
        );
        assert_eq!(message, "invalid status filter");
    }

    #[test]
    fn test_upstream_message_falls_back_to_reason() {
        assert_eq!(
            upstream_message(StatusCode::BAD_GATEWAY, "   "),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_upstream_message_truncated() {
        let message = upstream_message(StatusCode::INTERNAL_SERVER_ERROR, &"x".repeat(2000));
        assert!(message.chars().count() <= MAX_ERROR_MESSAGE_LEN + 1);
        assert!(message.ends_with('…'));
    }
}
