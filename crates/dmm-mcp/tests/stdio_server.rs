//! End-to-end tests: JSON-RPC lines in, JSON-RPC lines out, with the real HTTP
//! client talking to an in-process fake registry.

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use dmm_client::HttpConnector;
use dmm_core::{RegistryConfig, ServerConfig};
use dmm_mcp::{McpServer, StdioTransport};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

const API_KEY: &str = "secret-key";

async fn list_handler(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {API_KEY}");
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
    }
    match params.get("search").map(String::as_str) {
        Some("sales") => (
            StatusCode::OK,
            Json(json!([{
                "id": "dp-1",
                "title": "Sales Data",
                "description": "",
                "owner": "team-a"
            }])),
        ),
        Some("explode") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "boom"})),
        ),
        _ => (StatusCode::OK, Json(json!([]))),
    }
}

async fn search_handler(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    assert_eq!(params.get("resourceType").map(String::as_str), Some("DATA_PRODUCT"));
    if params.get("query").map(String::as_str) == Some("nothing") {
        return Json(json!({"results": []}));
    }
    Json(json!({
        "results": [{"id": "dp-2", "name": "Churn", "ownerId": "growth", "ownerName": "Growth"}]
    }))
}

async fn product_handler(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "dp-1" {
        (
            StatusCode::OK,
            Json(json!({
                "id": "dp-1",
                "info": {"title": "Orders"},
                "outputPorts": [{"id": "snowflake", "dataContractId": "dc-1"}]
            })),
        )
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"message": "not found"})))
    }
}

async fn contract_handler(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "dc-1" {
        (
            StatusCode::OK,
            Json(json!({"id": "dc-1", "terms": {"usage": "internal analytics"}})),
        )
    } else {
        (StatusCode::NOT_FOUND, Json(Value::Null))
    }
}

async fn spawn_registry() -> String {
    let app = Router::new()
        .route("/api/dataproducts", get(list_handler))
        .route("/api/dataproducts/{id}", get(product_handler))
        .route("/api/datacontracts/{id}", get(contract_handler))
        .route("/api/search", get(search_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn server_for(registry: RegistryConfig) -> Arc<McpServer> {
    let config = ServerConfig {
        registry: registry.clone(),
        ..Default::default()
    };
    let connector = HttpConnector::new(registry).unwrap();
    Arc::new(McpServer::new(Arc::new(config), Arc::new(connector)))
}

fn configured(base_url: &str) -> RegistryConfig {
    RegistryConfig {
        base_url: Some(base_url.to_string()),
        api_key: Some(API_KEY.to_string()),
        ..Default::default()
    }
}

fn call(id: u64, tool: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string()
}

/// Send `lines` to the server, close the input and return responses by id.
async fn exchange(server: Arc<McpServer>, lines: &[String]) -> HashMap<u64, Value> {
    let mut input = lines.join("\n");
    input.push('\n');
    let mut output = Vec::new();
    server
        .serve(StdioTransport::new(input.as_bytes(), &mut output))
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line).unwrap();
            (value["id"].as_u64().unwrap(), value)
        })
        .collect()
}

fn text_of(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_sales_listing_is_flattened() {
    let server = server_for(configured(&spawn_registry().await));
    let responses = exchange(
        server,
        &[call(1, "dataproduct_list", json!({"search_term": "sales"}))],
    )
    .await;

    let result = &responses[&1]["result"];
    assert_eq!(result["isError"], json!(false));
    assert_eq!(
        result["structuredContent"]["result"],
        json!([{"id": "dp-1", "name": "Sales Data", "description": "N/A", "owner": "team-a"}])
    );
    let text: Value = serde_json::from_str(text_of(&responses[&1])).unwrap();
    assert_eq!(text, result["structuredContent"]["result"]);
}

#[tokio::test]
async fn test_empty_listing() {
    let server = server_for(configured(&spawn_registry().await));
    let responses = exchange(server, &[call(1, "dataproduct_list", json!({}))]).await;
    assert_eq!(responses[&1]["result"]["structuredContent"]["result"], json!([]));
}

#[tokio::test]
async fn test_listing_upstream_failure() {
    let server = server_for(configured(&spawn_registry().await));
    let responses = exchange(
        server,
        &[call(1, "dataproduct_list", json!({"search_term": "explode"}))],
    )
    .await;

    let result = &responses[&1]["result"];
    assert_eq!(result["isError"], json!(true));
    let message = result["structuredContent"]["result"][0]["error"].as_str().unwrap();
    assert!(message.starts_with("Error fetching data products: "), "{message}");
    assert!(message.contains("500"), "{message}");
    assert!(message.contains("boom"), "{message}");
}

#[tokio::test]
async fn test_search_restricted_to_data_products() {
    let server = server_for(configured(&spawn_registry().await));
    let responses = exchange(
        server,
        &[call(1, "dataproduct_search", json!({"search_term": "churn"}))],
    )
    .await;

    assert_eq!(
        responses[&1]["result"]["structuredContent"]["result"],
        json!([{
            "id": "dp-2",
            "name": "Churn",
            "description": "N/A",
            "ownerId": "growth",
            "ownerName": "Growth"
        }])
    );
}

#[tokio::test]
async fn test_search_without_results() {
    let server = server_for(configured(&spawn_registry().await));
    let responses = exchange(
        server,
        &[call(1, "dataproduct_search", json!({"search_term": "nothing"}))],
    )
    .await;

    let result = &responses[&1]["result"];
    assert_eq!(result["isError"], json!(false));
    assert_eq!(result["structuredContent"]["result"], json!([]));
    assert_eq!(text_of(&responses[&1]), "[]");
}

#[tokio::test]
async fn test_product_then_contract() {
    let server = server_for(configured(&spawn_registry().await));
    let responses = exchange(
        server,
        &[
            call(1, "dataproduct_get", json!({"data_product_id": "dp-1"})),
            call(2, "datacontract_get", json!({"data_contract_id": "dc-1"})),
        ],
    )
    .await;

    let product: Value = serde_yaml::from_str(text_of(&responses[&1])).unwrap();
    assert_eq!(product["outputPorts"][0]["dataContractId"], json!("dc-1"));
    assert_eq!(
        text_of(&responses[&2]),
        "id: dc-1\nterms:\n  usage: internal analytics\n"
    );
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let server = server_for(configured(&spawn_registry().await));
    let responses = exchange(
        server,
        &[
            call(1, "dataproduct_get", json!({"data_product_id": "dp-404"})),
            call(2, "datacontract_get", json!({"data_contract_id": "dc-404"})),
            call(3, "dataproduct_get", json!({"data_product_id": ".."})),
        ],
    )
    .await;

    assert_eq!(text_of(&responses[&1]), "Data product not found");
    assert_eq!(text_of(&responses[&2]), "Data contract not found");
    assert_eq!(text_of(&responses[&3]), "Data product not found");
    assert_eq!(responses[&1]["result"]["isError"], json!(false));
}

#[tokio::test]
async fn test_missing_api_key_reported_by_every_tool() {
    let registry = RegistryConfig {
        base_url: Some(spawn_registry().await),
        api_key: None,
        ..Default::default()
    };
    let server = server_for(registry);
    let responses = exchange(
        server,
        &[
            call(1, "dataproduct_list", json!({})),
            call(2, "dataproduct_search", json!({"search_term": "x"})),
            call(3, "dataproduct_get", json!({"data_product_id": "dp-1"})),
            call(4, "datacontract_get", json!({"data_contract_id": "dc-1"})),
        ],
    )
    .await;

    let expected = "Data Mesh Manager API key is not configured. Set the DATAMESH_MANAGER_API_KEY environment variable.";
    for id in [1, 2] {
        assert_eq!(
            responses[&id]["result"]["structuredContent"]["result"],
            json!([{"error": expected}])
        );
    }
    for id in [3, 4] {
        assert_eq!(text_of(&responses[&id]), expected);
        assert_eq!(responses[&id]["result"]["isError"], json!(true));
    }
}

#[tokio::test]
async fn test_handshake_and_listing() {
    let server = server_for(configured(&spawn_registry().await));
    let lines = vec![
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 3, "method": "prompts/list"}).to_string(),
    ];
    let responses = exchange(server, &lines).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(
        responses[&1]["result"]["serverInfo"]["name"],
        json!("datamesh-manager")
    );
    assert_eq!(
        responses[&2]["result"]["tools"].as_array().unwrap().len(),
        4
    );
    assert_eq!(
        responses[&3]["result"]["prompts"][0]["name"],
        json!("Initial Prompt")
    );
}
