pub mod types;
pub mod usage;
pub mod tools;
pub mod trace;
pub mod error;
pub mod env;
pub mod settings;
pub mod config;
pub mod crew;
pub mod llm;

// Convenience re-exports at crate root
pub use config::{AgentSpec, CrewConfig, TaskSpec};
pub use crew::{Agent, Crew, CrewOutput, CrewRegistry, Task, TaskOutput};
pub use types::{LlmRequest, LlmResponse, Process, ToolCall};
pub use tools::{Tool, ToolRegistry, ToolFn, FnTool, CurrencyConverterTool, SerperSearchTool};
pub use llm::{LlmCaller, OpenAiCaller, RetryingLlmCaller};
pub use settings::{LlmSettings, Settings};
pub use trace::{TraceEntry, Trace};
pub use usage::TokenUsage;
pub use error::CrewError;
