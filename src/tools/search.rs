use std::collections::HashMap;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::settings::DEFAULT_SERPER_BASE;
use super::Tool;

const DEFAULT_RESULTS: u64 = 10;

/// One organic hit from a Serper search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub title:   String,
    pub link:    String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchResult>,
}

/// Web search through the Serper Google Search API.
pub struct SerperSearchTool {
    client:   reqwest::Client,
    base_url: String,
    api_key:  String,
    results:  u64,
}

impl SerperSearchTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_SERPER_BASE, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key:  api_key.into(),
            results:  DEFAULT_RESULTS,
        }
    }

    /// Number of results requested per query.
    pub fn with_results(mut self, n: u64) -> Self {
        self.results = n; self
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, String> {
        let response = self.client.post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": self.results }))
            .send()
            .await
            .map_err(|e| format!("Search request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "search service returned error status");
            return Err(format!("Search failed with status {}", status.as_u16()));
        }

        let body: SerperResponse = response.json()
            .await
            .map_err(|e| format!("Unreadable search response: {}", e))?;
        tracing::debug!(query, hits = body.organic.len(), "search complete");
        Ok(body.organic)
    }
}

/// Renders hits the way the model reads them: one block per result.
pub(crate) fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{}'.", query);
    }
    let mut out = format!("Search results for '{}':\n", query);
    for r in results {
        out.push_str(&format!("\nTitle: {}\nLink: {}\nSnippet: {}\n---", r.title, r.link, r.snippet));
    }
    out
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str { "web_search" }

    fn description(&self) -> &str {
        "Search the internet for current information. Use for any factual query or to verify a claim."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "The search query to look up" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: &HashMap<String, Value>) -> Result<String, String> {
        let query = args.get("query")
            .and_then(|v| v.as_str())
            .ok_or("Invalid input: 'query' must be a string")?;
        let results = self.search(query).await?;
        Ok(format_results(query, &results))
    }
}
