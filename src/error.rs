use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path:   String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("No entry '{name}' in {section} config")]
    MissingConfigKey { section: &'static str, name: String },

    #[error("Build error: {0}")]
    Build(String),

    #[error("LLM caller error: {0}")]
    Llm(String),

    #[error("Tool execution error: {0}")]
    Tool(String),

    #[error("Failed to write output {path}: {source}")]
    Output {
        path:   String,
        #[source]
        source: std::io::Error,
    },
}
