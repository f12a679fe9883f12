use serde_json::{json, Value};

use crate::crew::{Task, TaskOutput};
use crate::types::{ToolCall, ToolResult};

const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// The message list for one task, grown by each tool round.
#[derive(Debug, Clone)]
pub(crate) struct TaskConversation {
    messages: Vec<Value>,
}

impl TaskConversation {
    /// System persona, then the task prompt with earlier outputs as context.
    pub(crate) fn new(task: &Task, context: &[TaskOutput]) -> Self {
        let messages = vec![
            json!({ "role": "system", "content": task.agent.system_prompt() }),
            json!({ "role": "user",   "content": task_prompt(task, context) }),
        ];
        Self { messages }
    }

    /// Appends one assistant message carrying every call of the round,
    /// followed by one tool message per result.
    pub(crate) fn push_tool_round(&mut self, calls: &[ToolCall], results: &[ToolResult]) {
        let oai_tool_calls: Vec<Value> = calls.iter().enumerate().map(|(i, call)| {
            json!({
                "id": tool_call_id(call.id.as_deref(), i),
                "type": "function",
                "function": {
                    "name": call.name,
                    "arguments": serde_json::to_string(&call.args).unwrap_or_default()
                }
            })
        }).collect();

        self.messages.push(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": oai_tool_calls
        }));

        for (i, result) in results.iter().enumerate() {
            self.messages.push(json!({
                "role": "tool",
                "tool_call_id": tool_call_id(result.id.as_deref(), i),
                "content": result.output
            }));
        }
    }

    pub(crate) fn messages(&self) -> &[Value] {
        &self.messages
    }
}

fn tool_call_id(id: Option<&str>, index: usize) -> String {
    id.map(str::to_string).unwrap_or_else(|| format!("call_{}", index))
}

pub(crate) fn task_prompt(task: &Task, context: &[TaskOutput]) -> String {
    let mut prompt = format!(
        "{}\n\nThis is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        task.description, task.expected_output
    );

    if !context.is_empty() {
        let joined = context.iter()
            .map(|o| o.raw.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(&joined);
    }
    prompt
}
