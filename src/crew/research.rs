use std::path::Path;
use std::sync::Arc;

use crate::config::CrewConfig;
use crate::crew::{Agent, Crew, CrewRegistry, Task};
use crate::error::CrewError;
use crate::tools::Tool;

/// Everything the research crew's factories read from.
pub struct ResearchContext {
    pub config:      CrewConfig,
    pub search_tool: Arc<dyn Tool>,
    pub model:       String,
}

impl ResearchContext {
    pub fn new(config: CrewConfig, search_tool: Arc<dyn Tool>, model: impl Into<String>) -> Self {
        Self { config, search_tool, model: model.into() }
    }

    /// Loads `agents.yaml` and `tasks.yaml` from `config_dir`.
    pub fn load(
        config_dir:  impl AsRef<Path>,
        search_tool: Arc<dyn Tool>,
        model:       impl Into<String>,
    ) -> Result<Self, CrewError> {
        Ok(Self::new(CrewConfig::load_dir(config_dir)?, search_tool, model))
    }
}

/// Research → summarize → fact-check, each step by its own agent.
pub struct ResearchCrew;

impl ResearchCrew {
    pub fn registry() -> CrewRegistry<ResearchContext> {
        CrewRegistry::<ResearchContext>::new("ResearchCrew")
            .kind("research")
            .agent("research_agent", research_agent)
            .agent("summarization_agent", summarization_agent)
            .agent("fact_checker_agent", fact_checker_agent)
            .task("research_task", research_task)
            .task("summarization_task", summarization_task)
            .task("fact_checking_task", fact_checking_task)
            .crew(|ctx, agents, tasks| Ok(Crew::new(agents, tasks).model(ctx.model.clone())))
    }

    pub fn build(ctx: &ResearchContext) -> Result<Crew, CrewError> {
        Self::registry().build_crew(ctx)
    }
}

fn research_agent(ctx: &ResearchContext) -> Result<Agent, CrewError> {
    Ok(Agent::from_spec(ctx.config.agent("research_agent")?).tool(ctx.search_tool.clone()))
}

fn summarization_agent(ctx: &ResearchContext) -> Result<Agent, CrewError> {
    Ok(Agent::from_spec(ctx.config.agent("summarization_agent")?))
}

fn fact_checker_agent(ctx: &ResearchContext) -> Result<Agent, CrewError> {
    Ok(Agent::from_spec(ctx.config.agent("fact_checker_agent")?).tool(ctx.search_tool.clone()))
}

fn research_task(ctx: &ResearchContext) -> Result<Task, CrewError> {
    let spec = ctx.config.task("research_task")?;
    Ok(Task::from_spec("research_task", spec, research_agent(ctx)?).tool(ctx.search_tool.clone()))
}

fn summarization_task(ctx: &ResearchContext) -> Result<Task, CrewError> {
    let spec = ctx.config.task("summarization_task")?;
    Ok(Task::from_spec("summarization_task", spec, summarization_agent(ctx)?))
}

fn fact_checking_task(ctx: &ResearchContext) -> Result<Task, CrewError> {
    let spec = ctx.config.task("fact_checking_task")?;
    Ok(Task::from_spec("fact_checking_task", spec, fact_checker_agent(ctx)?).tool(ctx.search_tool.clone()))
}
