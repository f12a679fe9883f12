//! Ordered agent/task factories for a crew.
//!
//! A crew definition is a context type `C` (loaded config, shared tools)
//! plus a list of named factories that turn it into agents and tasks. The
//! registry calls each factory once per instantiation, in the order they were
//! registered, then hands both lists to the crew assembler.
//!
//! ```
//! use agentcrew::crew::{Agent, CrewRegistry, Task};
//!
//! struct Ctx { topic: String }
//!
//! let registry = CrewRegistry::<Ctx>::new("WriterCrew")
//!     .agent("writer", |_| Ok(Agent::new("Writer", "Write well", "Veteran columnist.")))
//!     .task("draft", |ctx| Ok(Task::new(
//!         "draft",
//!         format!("Write about {}", ctx.topic),
//!         "One paragraph.",
//!         Agent::new("Writer", "Write well", "Veteran columnist."),
//!     )));
//!
//! let crew = registry.build_crew(&Ctx { topic: "tides".into() }).unwrap();
//! assert_eq!(crew.agents.len(), 1);
//! assert_eq!(crew.tasks.len(), 1);
//! ```

use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::crew::{Agent, Crew, Task};
use crate::error::CrewError;

pub type AgentFactory<C> = Box<dyn Fn(&C) -> Result<Agent, CrewError> + Send + Sync>;
pub type TaskFactory<C>  = Box<dyn Fn(&C) -> Result<Task, CrewError> + Send + Sync>;
pub type CrewAssembler<C> =
    Box<dyn Fn(&C, Vec<Agent>, Vec<Task>) -> Result<Crew, CrewError> + Send + Sync>;

/// Descriptive metadata for a registered crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewInfo {
    pub name:    String,
    pub kind:    String,
    pub version: String,
    pub created: String,
    pub agents:  usize,
    pub tasks:   usize,
}

/// Agents and tasks produced by one instantiation, in declaration order.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub agents: Vec<Agent>,
    pub tasks:  Vec<Task>,
}

pub struct CrewRegistry<C> {
    name:      String,
    kind:      String,
    version:   String,
    created:   String,
    agents:    Vec<(String, AgentFactory<C>)>,
    tasks:     Vec<(String, TaskFactory<C>)>,
    assembler: Option<CrewAssembler<C>>,
}

impl<C> CrewRegistry<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:      name.into(),
            kind:      "custom".to_string(),
            version:   "1.0".to_string(),
            created:   Utc::now().year().to_string(),
            agents:    Vec::new(),
            tasks:     Vec::new(),
            assembler: None,
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into(); self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into(); self
    }

    pub fn created(mut self, created: impl Into<String>) -> Self {
        self.created = created.into(); self
    }

    /// Registers an agent factory. Re-using a name replaces the factory but
    /// keeps its original position.
    pub fn agent<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&C) -> Result<Agent, CrewError> + Send + Sync + 'static,
    {
        upsert(&mut self.agents, name.into(), Box::new(factory));
        self
    }

    /// Registers a task factory. Same replacement rule as `agent`.
    pub fn task<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&C) -> Result<Task, CrewError> + Send + Sync + 'static,
    {
        upsert(&mut self.tasks, name.into(), Box::new(factory));
        self
    }

    /// Sets the function that turns the instantiated lists into a crew.
    /// Without one, `build_crew` makes a sequential, verbose crew.
    pub fn crew<F>(mut self, assembler: F) -> Self
    where
        F: Fn(&C, Vec<Agent>, Vec<Task>) -> Result<Crew, CrewError> + Send + Sync + 'static,
    {
        self.assembler = Some(Box::new(assembler));
        self
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn info(&self) -> CrewInfo {
        CrewInfo {
            name:    self.name.clone(),
            kind:    self.kind.clone(),
            version: self.version.clone(),
            created: self.created.clone(),
            agents:  self.agents.len(),
            tasks:   self.tasks.len(),
        }
    }

    /// Calls every agent factory, then every task factory, once each.
    pub fn instantiate(&self, ctx: &C) -> Result<Assembly, CrewError> {
        let agents = self.agents.iter()
            .map(|(name, factory)| {
                tracing::debug!(crew = %self.name, agent = %name, "building agent");
                factory(ctx)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tasks = self.tasks.iter()
            .map(|(name, factory)| {
                tracing::debug!(crew = %self.name, task = %name, "building task");
                factory(ctx)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Assembly { agents, tasks })
    }

    pub fn build_crew(&self, ctx: &C) -> Result<Crew, CrewError> {
        let Assembly { agents, tasks } = self.instantiate(ctx)?;
        tracing::info!(crew = %self.name, agents = agents.len(), tasks = tasks.len(), "crew assembled");
        match &self.assembler {
            Some(assemble) => assemble(ctx, agents, tasks),
            None           => Ok(Crew::new(agents, tasks)),
        }
    }
}

fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    match entries.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None        => entries.push((name, value)),
    }
}
