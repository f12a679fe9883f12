//! # Currency Agent
//!
//! A one-task crew whose agent answers currency questions with the
//! `currency_converter` tool.
//!
//! # Usage
//! ```bash
//! OPENAI_API_KEY=sk-... EXCHANGE_RATE_API_KEY=... cargo run --example currency_agent -- "How much is 250 USD in JPY?"
//! ```

use agentcrew::{Agent, Crew, CurrencyConverterTool, OpenAiCaller, Settings, Task};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let question = std::env::args().nth(1)
        .unwrap_or_else(|| "How much is 100 USD in EUR?".to_string());

    let settings = Settings::from_env()?;
    let converter = Arc::new(CurrencyConverterTool::new(settings.exchange_rate_api_key()?));

    let analyst = Agent::new(
        "Currency Analyst",
        "Give accurate, current currency conversions",
        "You work on a trading desk and always check live rates before answering.",
    )
    .tool(converter);

    let task = Task::new(
        "convert",
        question,
        "A one-sentence answer with the converted amount to two decimals.",
        analyst.clone(),
    );

    let crew = Crew::new(vec![analyst], vec![task]).model(settings.llm.model.clone());
    let llm = OpenAiCaller::from_settings(&settings.llm);

    match crew.kickoff(&llm).await {
        Ok(output) => println!("\n{}", output),
        Err(e) => {
            eprintln!("Crew failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
