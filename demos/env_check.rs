//! # Environment Check
//!
//! Lists which LLM provider variables are set, then tests the configured
//! model backend with a single probe prompt.
//!
//! # Usage
//! ```bash
//! cargo run --example env_check
//! LLM_MODEL=ollama/llama3.2 cargo run --example env_check
//! ```

use agentcrew::env::{check_environment_variables, load_dotenv};
use agentcrew::llm::connection::test_connection;
use agentcrew::{LlmSettings, OpenAiCaller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    load_dotenv();

    println!("=== Environment Variables Status ===");
    let found = check_environment_variables();
    if found.is_empty() {
        println!("No LLM provider environment variables found.");
        println!("Make sure to set the appropriate API keys for your chosen provider.");
    }
    for status in &found {
        println!("\n{}:", status.provider);
        for (var, set) in &status.vars {
            println!("  {}: {}", var, if *set { "✅ Set" } else { "❌ Not set" });
        }
    }

    let settings = LlmSettings::from_env()?;
    let llm = OpenAiCaller::from_settings(&settings);
    let report = test_connection(&settings, &llm, &reqwest::Client::new()).await;

    println!("\n=== LLM Configuration Analysis ===");
    println!("Model: {}", report.model);
    println!("Base URL: {}", report.base_url.as_deref().unwrap_or("Default (provider-specific)"));
    println!("API Key Set: {}", if report.api_key_set { "Yes" } else { "No" });
    println!("Detected Provider: {:?}", report.provider);

    if let Some(probe) = &report.ollama {
        match (&probe.error, probe.status) {
            (Some(e), None) => println!("❌ Ollama server connection failed: {}", e),
            (_, Some(status)) => {
                println!("Ollama Server Status: {}", status);
                println!("Available Models: {} found", probe.models_found);
                println!("Target Model Available: {}", if probe.model_available { "Yes" } else { "No" });
            }
            (None, None) => {}
        }
    }

    match &report.call {
        Ok(text) => println!("✅ LLM call successful! Response: {}", text.chars().take(100).collect::<String>()),
        Err(e) => {
            println!("❌ LLM call failed: {}", e);
            if let Some(tip) = report.tip {
                println!("💡 Tip: {}", tip);
            }
        }
    }
    Ok(())
}
