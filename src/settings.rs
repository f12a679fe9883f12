use crate::env::{optional_var, require_var};
use crate::error::CrewError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434";
pub const DEFAULT_EXCHANGE_RATE_BASE: &str = "https://v6.exchangerate-api.com";
pub const DEFAULT_SERPER_BASE: &str = "https://google.serper.dev";

/// Strips the `ollama/` routing prefix from a configured model name.
pub fn wire_model(model: &str) -> &str {
    model.strip_prefix("ollama/").unwrap_or(model)
}

/// Which model backend a settings value points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// api.openai.com or any OpenAI-compatible gateway
    OpenAi,
    /// Local Ollama server through its `/v1` OpenAI-compatible API
    Ollama,
}

/// Connection details for the shared model client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// Model as configured, e.g. `gpt-4o-mini` or `ollama/llama3.2`
    pub model:    String,
    /// Server root. `None` means the provider default.
    pub base_url: Option<String>,
    pub api_key:  Option<String>,
}

impl LlmSettings {
    /// Reads `LLM_MODEL`, then the variables the selected backend needs.
    ///
    /// Ollama models need no key; every other model requires `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, CrewError> {
        let model = optional_var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let settings = if model.starts_with("ollama/") {
            Self {
                model,
                base_url: Some(optional_var("OLLAMA_API_BASE")
                    .unwrap_or_else(|| DEFAULT_OLLAMA_BASE.to_string())),
                api_key:  None,
            }
        } else {
            Self {
                model,
                base_url: optional_var("OPENAI_BASE_URL"),
                api_key:  Some(require_var("OPENAI_API_KEY")?),
            }
        };

        tracing::info!(
            model    = %settings.model,
            base_url = settings.base_url.as_deref().unwrap_or("default"),
            "LLM settings loaded"
        );
        Ok(settings)
    }

    pub fn backend(&self) -> Backend {
        if self.model.starts_with("ollama/") { Backend::Ollama } else { Backend::OpenAi }
    }

    /// The model name to send on the wire (provider prefix removed).
    pub fn api_model(&self) -> &str {
        wire_model(&self.model)
    }

    /// Base URL for the chat-completions client, `None` for the provider default.
    pub fn api_base(&self) -> Option<String> {
        let base = self.base_url.as_deref()?.trim_end_matches('/');
        match self.backend() {
            Backend::Ollama if !base.ends_with("/v1") => Some(format!("{}/v1", base)),
            _ => Some(base.to_string()),
        }
    }
}

/// Everything a crew run reads from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub llm:                   LlmSettings,
    pub exchange_rate_api_key: Option<String>,
    pub serper_api_key:        Option<String>,
}

impl Settings {
    /// Loads `.env` defaults, then reads the LLM settings. Tool keys are
    /// optional here and checked by the accessors below.
    pub fn from_env() -> Result<Self, CrewError> {
        crate::env::load_dotenv();
        Ok(Self {
            llm:                   LlmSettings::from_env()?,
            exchange_rate_api_key: optional_var("EXCHANGE_RATE_API_KEY"),
            serper_api_key:        optional_var("SERPER_API_KEY"),
        })
    }

    pub fn exchange_rate_api_key(&self) -> Result<&str, CrewError> {
        self.exchange_rate_api_key.as_deref()
            .ok_or_else(|| CrewError::MissingEnv("EXCHANGE_RATE_API_KEY".to_string()))
    }

    pub fn serper_api_key(&self) -> Result<&str, CrewError> {
        self.serper_api_key.as_deref()
            .ok_or_else(|| CrewError::MissingEnv("SERPER_API_KEY".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(base: &str) -> LlmSettings {
        LlmSettings {
            model:    "ollama/llama3.2".to_string(),
            base_url: Some(base.to_string()),
            api_key:  None,
        }
    }

    #[test]
    fn ollama_prefix_is_stripped_and_v1_appended() {
        let s = ollama("http://localhost:11434/");
        assert_eq!(s.backend(), Backend::Ollama);
        assert_eq!(s.api_model(), "llama3.2");
        assert_eq!(s.api_base().as_deref(), Some("http://localhost:11434/v1"));

        let already = ollama("http://gpu-box:11434/v1");
        assert_eq!(already.api_base().as_deref(), Some("http://gpu-box:11434/v1"));
    }

    #[test]
    fn openai_defaults_leave_base_unset() {
        let s = LlmSettings {
            model:    "gpt-4o".to_string(),
            base_url: None,
            api_key:  Some("sk-test".to_string()),
        };
        assert_eq!(s.backend(), Backend::OpenAi);
        assert_eq!(s.api_model(), "gpt-4o");
        assert_eq!(s.api_base(), None);
    }

    #[test]
    fn missing_tool_keys_are_reported_by_name() {
        let settings = Settings {
            llm: ollama(DEFAULT_OLLAMA_BASE),
            exchange_rate_api_key: None,
            serper_api_key: Some("k".to_string()),
        };
        let err = settings.exchange_rate_api_key().unwrap_err();
        assert!(err.to_string().contains("EXCHANGE_RATE_API_KEY"));
        assert_eq!(settings.serper_api_key().unwrap(), "k");
    }
}
