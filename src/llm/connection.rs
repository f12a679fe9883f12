//! Connection diagnostics for the configured model backend.
//!
//! [`test_connection`] inspects the settings, probes a local Ollama server
//! when one is configured, and sends one tiny completion through the caller.
//! Nothing here fails: every outcome lands in the returned report.

use std::time::Duration;
use serde::Deserialize;

use crate::llm::LlmCaller;
use crate::settings::LlmSettings;
use crate::types::{LlmRequest, LlmResponse};

pub const PROBE_PROMPT: &str = "Respond with exactly: 'Test successful'";
const OLLAMA_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAi,
    Anthropic,
    Google,
    Unknown,
}

impl Provider {
    /// Guesses the provider from the model name.
    pub fn detect(model: &str) -> Self {
        let m = model.to_lowercase();
        if m.contains("ollama") {
            Provider::Ollama
        } else if m.contains("gpt") || m.contains("openai") {
            Provider::OpenAi
        } else if m.contains("claude") || m.contains("anthropic") {
            Provider::Anthropic
        } else if m.contains("gemini") || m.contains("google") {
            Provider::Google
        } else {
            Provider::Unknown
        }
    }

    /// Environment variable that carries this provider's key, if any.
    pub fn key_var(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi    => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Google    => Some("GOOGLE_API_KEY"),
            Provider::Ollama | Provider::Unknown => None,
        }
    }
}

/// Result of probing an Ollama server's `/api/tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaProbe {
    pub status:          Option<u16>,
    pub models_found:    usize,
    pub model_available: bool,
    pub error:           Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConnectionReport {
    pub provider:    Provider,
    pub model:       String,
    pub base_url:    Option<String>,
    pub api_key_set: bool,
    /// Whether the provider's key variable is present in the environment
    pub key_env_set: Option<bool>,
    pub ollama:      Option<OllamaProbe>,
    /// The probe completion's text, or the error it failed with
    pub call:        Result<String, String>,
    pub tip:         Option<&'static str>,
}

impl ConnectionReport {
    pub fn is_ok(&self) -> bool {
        self.call.is_ok()
    }
}

/// Picks a troubleshooting hint from an error message.
pub fn troubleshooting_tip(error: &str) -> &'static str {
    let e = error.to_lowercase();
    if e.contains("connection") || e.contains("timeout") {
        "Check network connection and base_url configuration"
    } else if e.contains("api_key") || e.contains("api key") || e.contains("authentication") || e.contains("unauthorized") {
        "Check API key configuration and permissions"
    } else if e.contains("model") || e.contains("not found") {
        "Verify model name and availability"
    } else {
        "This might be a provider-specific error. Check the LLM provider documentation."
    }
}

#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<serde_json::Value>,
}

/// Lists the models an Ollama server has pulled and checks for `model`.
pub async fn probe_ollama(client: &reqwest::Client, base_url: &str, model: &str) -> OllamaProbe {
    let url = format!("{}/api/tags", base_url.trim_end_matches('/').trim_end_matches("/v1"));
    let target = model.strip_prefix("ollama/").unwrap_or(model);

    let response = match client.get(&url).timeout(OLLAMA_PROBE_TIMEOUT).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Ollama server connection failed");
            return OllamaProbe { status: None, models_found: 0, model_available: false, error: Some(e.to_string()) };
        }
    };

    let status = response.status().as_u16();
    if !response.status().is_success() {
        tracing::warn!(url = %url, status, "Ollama server responded with error status");
        return OllamaProbe { status: Some(status), models_found: 0, model_available: false, error: None };
    }

    match response.json::<OllamaTags>().await {
        Ok(tags) => {
            let model_available = tags.models.iter().any(|m| m.to_string().contains(target));
            tracing::info!(models = tags.models.len(), model_available, "Ollama server reachable");
            OllamaProbe { status: Some(status), models_found: tags.models.len(), model_available, error: None }
        }
        Err(e) => OllamaProbe { status: Some(status), models_found: 0, model_available: false, error: Some(e.to_string()) },
    }
}

/// Runs every check that applies to `settings` and sends one probe prompt.
pub async fn test_connection(
    settings: &LlmSettings,
    llm:      &dyn LlmCaller,
    http:     &reqwest::Client,
) -> ConnectionReport {
    let provider = Provider::detect(&settings.model);
    tracing::info!(model = %settings.model, ?provider, "testing LLM connection");

    let ollama = match (provider, settings.base_url.as_deref()) {
        (Provider::Ollama, Some(base)) => Some(probe_ollama(http, base, &settings.model).await),
        _ => None,
    };

    let key_env_set = provider.key_var()
        .map(|var| crate::env::optional_var(var).is_some());

    let request = LlmRequest {
        model:    settings.api_model().to_string(),
        messages: vec![serde_json::json!({ "role": "user", "content": PROBE_PROMPT })],
        tools:    Vec::new(),
    };

    let call = match llm.call(&request).await {
        Ok(LlmResponse::FinalAnswer { content, .. }) => Ok(content),
        Ok(LlmResponse::ToolCalls { .. }) => Ok("[model answered with a tool call]".to_string()),
        Err(e) => Err(e),
    };

    let tip = match &call {
        Ok(text) => {
            tracing::info!(response = %text.chars().take(100).collect::<String>(), "LLM call successful");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "LLM call failed");
            Some(troubleshooting_tip(e))
        }
    };

    ConnectionReport {
        provider,
        model:       settings.model.clone(),
        base_url:    settings.base_url.clone(),
        api_key_set: settings.api_key.is_some(),
        key_env_set,
        ollama,
        call,
        tip,
    }
}
