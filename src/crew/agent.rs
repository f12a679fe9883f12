use std::sync::Arc;

use crate::config::AgentSpec;
use crate::tools::Tool;

/// A persona the model is asked to adopt while working a task.
#[derive(Clone)]
pub struct Agent {
    pub role:             String,
    pub goal:             String,
    pub backstory:        String,
    pub tools:            Vec<Arc<dyn Tool>>,
    pub verbose:          bool,
    pub allow_delegation: bool,
    /// Model override; `None` uses the crew's model
    pub llm:              Option<String>,
}

impl Agent {
    pub fn new(role: impl Into<String>, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            role:             role.into(),
            goal:             goal.into(),
            backstory:        backstory.into(),
            tools:            Vec::new(),
            verbose:          true,
            allow_delegation: false,
            llm:              None,
        }
    }

    pub fn from_spec(spec: &AgentSpec) -> Self {
        Self {
            role:             spec.role.clone(),
            goal:             spec.goal.clone(),
            backstory:        spec.backstory.clone(),
            tools:            Vec::new(),
            verbose:          spec.verbose,
            allow_delegation: spec.allow_delegation,
            llm:              spec.llm.clone(),
        }
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool); self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools); self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose; self
    }

    pub fn llm(mut self, model: impl Into<String>) -> Self {
        self.llm = Some(model.into()); self
    }

    /// The system prompt that puts the model in character.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("tools", &self.tool_names())
            .field("verbose", &self.verbose)
            .field("allow_delegation", &self.allow_delegation)
            .field("llm", &self.llm)
            .finish()
    }
}
