//! Process environment helpers: `.env` loading, required variables, and a
//! provider-by-provider report of which LLM credentials are present.

use crate::error::CrewError;

/// Environment variables recognised for each LLM provider.
pub const PROVIDER_ENV_VARS: &[(&str, &[&str])] = &[
    ("OpenAI",       &["OPENAI_API_KEY", "OPENAI_BASE_URL"]),
    ("Anthropic",    &["ANTHROPIC_API_KEY"]),
    ("Google",       &["GOOGLE_API_KEY", "GOOGLE_APPLICATION_CREDENTIALS"]),
    ("Cohere",       &["COHERE_API_KEY"]),
    ("Hugging Face", &["HUGGINGFACE_API_KEY", "HF_TOKEN"]),
    ("Ollama",       &["OLLAMA_API_BASE", "OLLAMA_HOST"]),
    ("Azure OpenAI", &["AZURE_OPENAI_API_KEY", "AZURE_OPENAI_ENDPOINT"]),
    ("AWS Bedrock",  &["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_REGION"]),
    ("Together AI",  &["TOGETHER_API_KEY"]),
    ("Replicate",    &["REPLICATE_API_TOKEN"]),
    ("Perplexity",   &["PERPLEXITYAI_API_KEY"]),
    ("Groq",         &["GROQ_API_KEY"]),
];

/// Loads `.env` from the current directory or any parent.
///
/// Variables already present in the process environment win. A missing
/// `.env` file is not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => tracing::debug!("no .env file found"),
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}

/// Returns the value of `name`, treating an empty value as unset.
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the value of `name` or `CrewError::MissingEnv(name)`.
pub fn require_var(name: &str) -> Result<String, CrewError> {
    optional_var(name).ok_or_else(|| CrewError::MissingEnv(name.to_string()))
}

/// Presence of each variable for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEnvStatus {
    pub provider: &'static str,
    pub vars:     Vec<(&'static str, bool)>,
}

impl ProviderEnvStatus {
    pub fn any_set(&self) -> bool {
        self.vars.iter().any(|(_, set)| *set)
    }
}

/// Reports, for every known provider with at least one variable set, which
/// of its variables are present. Values are never logged.
pub fn check_environment_variables() -> Vec<ProviderEnvStatus> {
    check_with(|name| optional_var(name).is_some())
}

fn check_with(is_set: impl Fn(&str) -> bool) -> Vec<ProviderEnvStatus> {
    let found: Vec<ProviderEnvStatus> = PROVIDER_ENV_VARS
        .iter()
        .map(|(provider, vars)| ProviderEnvStatus {
            provider: *provider,
            vars: vars.iter().map(|v| (*v, is_set(v))).collect(),
        })
        .filter(ProviderEnvStatus::any_set)
        .collect();

    if found.is_empty() {
        tracing::warn!("no LLM provider environment variables found");
    }
    for status in &found {
        for (var, set) in &status.vars {
            tracing::info!(provider = status.provider, var, set, "provider env");
        }
    }
    found
}
