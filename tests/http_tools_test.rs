//! Currency and search tools against a local one-shot HTTP server.

mod common;

use agentcrew::tools::{
    ConversionError, ConversionRequest, CurrencyConverterTool, HttpRateSource, SerperSearchTool, Tool,
};
use common::{closed_port_url, serve_once};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

fn converter(base_url: &str) -> CurrencyConverterTool {
    CurrencyConverterTool::with_source(Arc::new(HttpRateSource::with_base_url(base_url, "test-key")))
}

fn conversion_args(amount: Value, from: &str, to: &str) -> HashMap<String, Value> {
    [
        ("amount".to_string(),        amount),
        ("from_currency".to_string(), json!(from)),
        ("to_currency".to_string(),   json!(to)),
    ].into()
}

fn usd_body() -> String {
    json!({
        "result": "success",
        "base_code": "USD",
        "conversion_rates": { "USD": 1.0, "EUR": 0.91, "JPY": 151.37 }
    }).to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency converter
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_conversion_hits_latest_endpoint_for_source_currency() {
    let (url, server) = serve_once("200 OK", usd_body()).await;

    let text = converter(&url).execute(&conversion_args(json!(100), "USD", "EUR")).await;
    assert_eq!(text, Ok("100 USD is equivalent to 91.00 EUR.".to_string()));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /v6/test-key/latest/USD "), "request was: {}", request);
}

#[tokio::test]
async fn test_non_success_status_returns_fixed_failure_text() {
    let (url, _server) = serve_once("403 Forbidden", json!({"result": "error"}).to_string()).await;

    let text = converter(&url).execute(&conversion_args(json!(42.5), "USD", "JPY")).await;
    assert_eq!(text, Err("Failed to fetch exchange rates.".to_string()));
}

#[tokio::test]
async fn test_unknown_target_code_returns_invalid_currency_text() {
    let (url, _server) = serve_once("200 OK", usd_body()).await;

    let text = converter(&url).execute(&conversion_args(json!(1), "USD", "ABC")).await;
    assert_eq!(text, Err("Invalid currency code: ABC".to_string()));
}

#[tokio::test]
async fn test_zero_amount_converts_to_zero() {
    let (url, _server) = serve_once("200 OK", usd_body()).await;

    let request = ConversionRequest {
        amount:        0.0,
        from_currency: "USD".to_string(),
        to_currency:   "JPY".to_string(),
    };
    let conversion = converter(&url).convert(&request).await.unwrap();
    assert_eq!(conversion.converted, 0.0);
    assert_eq!(conversion.to_string(), "0 USD is equivalent to 0.00 JPY.");
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_error() {
    let url = closed_port_url().await;
    let request = ConversionRequest {
        amount:        1.0,
        from_currency: "USD".to_string(),
        to_currency:   "EUR".to_string(),
    };

    let err = converter(&url).convert(&request).await.unwrap_err();
    assert!(matches!(err, ConversionError::Transport(_)), "got: {:?}", err);
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_posts_query_with_api_key() {
    let body = json!({
        "organic": [
            { "title": "Agents in 2025", "link": "https://example.com/a", "snippet": "A survey." },
            { "title": "Crew patterns",  "link": "https://example.com/b" }
        ]
    }).to_string();
    let (url, server) = serve_once("200 OK", body).await;

    let tool = SerperSearchTool::with_base_url(&url, "serper-key").with_results(5);
    let args: HashMap<String, Value> = [("query".to_string(), json!("ai agents"))].into();
    let text = tool.execute(&args).await.unwrap();

    assert!(text.starts_with("Search results for 'ai agents':"));
    assert!(text.contains("Title: Agents in 2025"));
    assert!(text.contains("Link: https://example.com/b"));

    let request = server.await.unwrap();
    let lower = request.to_lowercase();
    assert!(request.starts_with("POST /search "), "request was: {}", request);
    assert!(lower.contains("x-api-key: serper-key"));
    assert!(request.contains(r#""q":"ai agents""#));
    assert!(request.contains(r#""num":5"#));
}

#[tokio::test]
async fn test_search_error_status_is_reported() {
    let (url, _server) = serve_once("401 Unauthorized", json!({"message": "bad key"}).to_string()).await;

    let tool = SerperSearchTool::with_base_url(&url, "wrong");
    let err = tool.search("anything").await.unwrap_err();
    assert_eq!(err, "Search failed with status 401");
}
