//! YAML crew documents.
//!
//! A crew document has two top-level mappings:
//!
//! ```yaml
//! agents:
//!   research_agent:
//!     role: Research Specialist
//!     goal: Find accurate, current information on {topic}
//!     backstory: You have spent a decade digging through sources.
//! tasks:
//!   research_task:
//!     description: Research {topic}.
//!     expected_output: A bullet list of findings with sources.
//!     agent: research_agent
//! ```
//!
//! The same records can also be split over `agents.yaml` and `tasks.yaml`
//! in one directory, each holding the bare name → record mapping.
//!
//! A config is loaded once and never mutated; pass it by reference to
//! whatever builds agents and tasks from it.

use crate::error::CrewError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn default_true() -> bool { true }

/// Persona record for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub role:      String,
    pub goal:      String,
    pub backstory: String,
    #[serde(default = "default_true")]
    pub verbose:   bool,
    #[serde(default)]
    pub allow_delegation: bool,
    /// Per-agent model override, e.g. `ollama/llama3.2`
    #[serde(default)]
    pub llm:       Option<String>,
}

/// Work record for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description:     String,
    pub expected_output: String,
    /// Name of the agent (in the same document) that performs the task
    #[serde(default)]
    pub agent:           Option<String>,
    /// Path the task's raw output is written to after it runs
    #[serde(default)]
    pub output_file:     Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewConfig {
    #[serde(default)]
    pub agents: HashMap<String, AgentSpec>,
    #[serde(default)]
    pub tasks:  HashMap<String, TaskSpec>,
}

impl CrewConfig {
    /// Parses a single document with `agents` and `tasks` keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CrewError> {
        parse(yaml, "<inline>")
    }

    /// Reads a single document with `agents` and `tasks` keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CrewError> {
        let path = path.as_ref();
        let config: Self = parse(&read(path)?, &path.display().to_string())?;
        tracing::info!(
            path   = %path.display(),
            agents = config.agents.len(),
            tasks  = config.tasks.len(),
            "crew config loaded"
        );
        Ok(config)
    }

    /// Reads `agents.yaml` and `tasks.yaml` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CrewError> {
        let dir = dir.as_ref();
        let agents_path = dir.join("agents.yaml");
        let tasks_path  = dir.join("tasks.yaml");

        let agents: HashMap<String, AgentSpec> =
            parse(&read(&agents_path)?, &agents_path.display().to_string())?;
        let tasks: HashMap<String, TaskSpec> =
            parse(&read(&tasks_path)?, &tasks_path.display().to_string())?;

        tracing::info!(
            dir    = %dir.display(),
            agents = agents.len(),
            tasks  = tasks.len(),
            "crew config loaded"
        );
        Ok(Self { agents, tasks })
    }

    pub fn agent(&self, name: &str) -> Result<&AgentSpec, CrewError> {
        self.agents.get(name).ok_or_else(|| CrewError::MissingConfigKey {
            section: "agents",
            name:    name.to_string(),
        })
    }

    pub fn task(&self, name: &str) -> Result<&TaskSpec, CrewError> {
        self.tasks.get(name).ok_or_else(|| CrewError::MissingConfigKey {
            section: "tasks",
            name:    name.to_string(),
        })
    }
}

fn read(path: &Path) -> Result<String, CrewError> {
    std::fs::read_to_string(path).map_err(|source| CrewError::ConfigIo {
        path: path.display().to_string(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(yaml: &str, origin: &str) -> Result<T, CrewError> {
    serde_yaml::from_str(yaml).map_err(|source| CrewError::ConfigParse {
        path: origin.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
agents:
  writer:
    role: Writer
    goal: Write clearly
    backstory: Former newspaper editor.
    allow_delegation: true
tasks:
  draft:
    description: Draft a paragraph about {topic}.
    expected_output: One paragraph.
    agent: writer
"#;

    #[test]
    fn defaults_fill_optional_agent_fields() {
        let config = CrewConfig::from_yaml_str(DOC).unwrap();
        let writer = config.agent("writer").unwrap();
        assert!(writer.verbose);
        assert!(writer.allow_delegation);
        assert_eq!(writer.llm, None);

        let draft = config.task("draft").unwrap();
        assert_eq!(draft.agent.as_deref(), Some("writer"));
        assert_eq!(draft.output_file, None);
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let err = CrewConfig::from_yaml_str("agents:\n  a:\n    role: R\n    goal: G\n").unwrap_err();
        assert!(matches!(err, CrewError::ConfigParse { .. }));
        assert!(err.to_string().contains("backstory"));
    }

    #[test]
    fn lookup_error_names_section_and_key() {
        let config = CrewConfig::from_yaml_str(DOC).unwrap();
        let err = config.task("publish").unwrap_err();
        assert_eq!(err.to_string(), "No entry 'publish' in tasks config");
    }
}
