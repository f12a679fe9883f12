use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::TaskSpec;
use crate::crew::Agent;
use crate::tools::{Tool, ToolRegistry};

/// One unit of work in a crew, performed by one agent.
#[derive(Debug, Clone)]
pub struct Task {
    pub name:            String,
    pub description:     String,
    pub expected_output: String,
    pub agent:           Agent,
    /// Overrides the agent's tools when non-empty
    pub tools:           Vec<Arc<dyn Tool>>,
    pub output_file:     Option<PathBuf>,
}

impl Task {
    pub fn new(
        name:            impl Into<String>,
        description:     impl Into<String>,
        expected_output: impl Into<String>,
        agent:           Agent,
    ) -> Self {
        Self {
            name:            name.into(),
            description:     description.into(),
            expected_output: expected_output.into(),
            agent,
            tools:           Vec::new(),
            output_file:     None,
        }
    }

    pub fn from_spec(name: impl Into<String>, spec: &TaskSpec, agent: Agent) -> Self {
        let mut task = Self::new(name, spec.description.clone(), spec.expected_output.clone(), agent);
        task.output_file = spec.output_file.as_ref().map(PathBuf::from);
        task
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool); self
    }

    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into()); self
    }

    /// Tools available while running: the task's own, else the agent's.
    pub fn effective_tools(&self) -> ToolRegistry {
        let tools = if self.tools.is_empty() { &self.agent.tools } else { &self.tools };
        tools.iter().cloned().collect()
    }

    /// Replaces `{key}` placeholders in the description, expected output
    /// and agent persona. Unknown placeholders are left as they are.
    pub fn interpolate(&mut self, inputs: &HashMap<String, String>) {
        if inputs.is_empty() {
            return;
        }
        for field in [
            &mut self.description,
            &mut self.expected_output,
            &mut self.agent.role,
            &mut self.agent.goal,
            &mut self.agent.backstory,
        ] {
            *field = interpolate(field, inputs);
        }
    }
}

/// Single left-to-right pass: substituted values are never rescanned, and
/// unknown `{name}` placeholders are left as written.
fn interpolate(template: &str, inputs: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => match inputs.get(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FnTool;
    use serde_json::json;

    fn tool(name: &str) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(name, "t", json!({}), Box::new(|_| Ok(String::new()))))
    }

    #[test]
    fn placeholders_are_filled_everywhere() {
        let agent = Agent::new("{topic} researcher", "Learn about {topic}", "Curious.");
        let mut task = Task::new("t", "Research {topic} in {year}.", "Notes on {topic}.", agent);
        let inputs: HashMap<String, String> = [("topic".to_string(), "AI Agents".to_string())].into();

        task.interpolate(&inputs);

        assert_eq!(task.description, "Research AI Agents in {year}.");
        assert_eq!(task.expected_output, "Notes on AI Agents.");
        assert_eq!(task.agent.role, "AI Agents researcher");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let agent = Agent::new("r", "g", "b");
        let mut task = Task::new("t", "Compare {a} with {b} {c", "{x}", agent);
        let inputs: HashMap<String, String> = [
            ("a".to_string(), "{b}".to_string()),
            ("b".to_string(), "{a}".to_string()),
        ].into();

        for _ in 0..8 {
            let mut t = task.clone();
            t.interpolate(&inputs);
            assert_eq!(t.description, "Compare {b} with {a} {c");
            assert_eq!(t.expected_output, "{x}");
        }
        task.interpolate(&HashMap::new());
        assert_eq!(task.description, "Compare {a} with {b} {c");
    }

    #[test]
    fn task_tools_override_agent_tools() {
        let agent = Agent::new("r", "g", "b").tool(tool("agent_tool"));
        let plain = Task::new("a", "d", "e", agent.clone());
        assert!(plain.effective_tools().has("agent_tool"));

        let own = Task::new("b", "d", "e", agent).tool(tool("task_tool"));
        let registry = own.effective_tools();
        assert!(registry.has("task_tool"));
        assert!(!registry.has("agent_tool"));
    }
}
