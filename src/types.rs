use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tools::ToolSchema;
use crate::usage::TokenUsage;

/// A tool invocation requested by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: HashMap<String, serde_json::Value>,
    pub id:   Option<String>,
}

/// Result of one tool execution, as fed back to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub id:        Option<String>,
    pub output:    String,      // "SUCCESS: ..." or "ERROR: ..."
    pub success:   bool,
}

impl ToolResult {
    pub fn success(call: &ToolCall, output: String) -> Self {
        Self { tool_name: call.name.clone(), id: call.id.clone(),
               output: format!("SUCCESS: {}", output), success: true }
    }

    pub fn failure(call: &ToolCall, error: String) -> Self {
        Self { tool_name: call.name.clone(), id: call.id.clone(),
               output: format!("ERROR: {}", error), success: false }
    }
}

/// One chat completion request. `messages` are OpenAI-format JSON messages.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model:    String,
    pub messages: Vec<serde_json::Value>,
    pub tools:    Vec<ToolSchema>,
}

/// What the LLM can return. Always one of these two variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LlmResponse {
    /// LLM wants to invoke one or more tools before answering
    ToolCalls {
        tools: Vec<ToolCall>,
        usage: Option<TokenUsage>,
    },
    /// LLM produced its answer for the task
    FinalAnswer {
        content: String,
        usage:   Option<TokenUsage>,
    },
}

impl LlmResponse {
    pub fn usage(&self) -> Option<TokenUsage> {
        match self {
            LlmResponse::ToolCalls { usage, .. } | LlmResponse::FinalAnswer { usage, .. } => *usage,
        }
    }
}

/// Execution order of a crew's tasks. Only sequential execution exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Process {
    #[default]
    Sequential,
}
