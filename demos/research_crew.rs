//! # Research Crew
//!
//! Runs the research → summarize → fact-check crew defined in `config/`
//! and writes the final report to `output/research_report.md`.
//!
//! # Usage
//! ```bash
//! OPENAI_API_KEY=sk-... SERPER_API_KEY=... cargo run --example research_crew -- "AI Agents"
//! LLM_MODEL=ollama/llama3.2 SERPER_API_KEY=... cargo run --example research_crew
//! RUST_LOG=agentcrew=debug cargo run --example research_crew
//! ```

use agentcrew::crew::{ResearchContext, ResearchCrew};
use agentcrew::{OpenAiCaller, RetryingLlmCaller, SerperSearchTool, Settings};
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging — set RUST_LOG=debug|info|warn
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let topic = std::env::args().nth(1).unwrap_or_else(|| "AI Agents".to_string());

    // Missing keys stop the run here with the variable's name.
    let settings = Settings::from_env()?;
    let search = Arc::new(SerperSearchTool::new(settings.serper_api_key()?));

    let ctx = ResearchContext::load("config", search, settings.llm.model.clone())?;
    let registry = ResearchCrew::registry();
    let info = registry.info();
    println!("=== {} v{} ({} agents, {} tasks) ===\n", info.name, info.version, info.agents, info.tasks);

    let crew = registry.build_crew(&ctx)?;
    let llm = RetryingLlmCaller::new(Arc::new(OpenAiCaller::from_settings(&settings.llm)), 3);

    let inputs: HashMap<String, String> = [("topic".to_string(), topic)].into();
    let output = crew.kickoff_with_inputs(&llm, &inputs).await?;

    println!("\n╔══════════════════════╗");
    println!("║    FINAL REPORT      ║");
    println!("╚══════════════════════╝");
    println!("{}\n", output.raw);
    println!("tokens used: {}", output.token_usage.total_tokens);
    output.trace.print();

    Ok(())
}
