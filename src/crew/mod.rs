//! Agents, tasks, and the crews that run them.
//!
//! A [`Crew`] runs its tasks strictly in order. Each task is handed to the
//! model once, in the voice of its agent, with every earlier task's output as
//! context. When the model asks for tools, the calls are executed and the
//! observations sent back, for at most `max_tool_rounds` rounds; after that
//! the model is asked again without tools and must answer.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;
use chrono::Utc;

use crate::error::CrewError;
use crate::llm::LlmCaller;
use crate::settings::{wire_model, DEFAULT_MODEL};
use crate::trace::{Trace, TraceEntry};
use crate::types::{LlmRequest, LlmResponse, Process, ToolResult};
use crate::usage::TokenUsage;

mod agent;
mod task;
mod prompt;
pub mod registry;
pub mod research;

pub use agent::Agent;
pub use task::Task;
pub use registry::{CrewInfo, CrewRegistry};
pub use research::{ResearchContext, ResearchCrew};

use prompt::TaskConversation;

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 1;

/// What one task produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutput {
    pub name:        String,
    pub description: String,
    /// Role of the agent that performed the task
    pub agent:       String,
    pub raw:         String,
}

/// Result of a whole crew run. `raw` is the last task's output.
#[derive(Debug, Clone)]
pub struct CrewOutput {
    pub run_id:       Uuid,
    pub raw:          String,
    pub tasks_output: Vec<TaskOutput>,
    pub token_usage:  TokenUsage,
    pub trace:        Trace,
}

impl CrewOutput {
    /// Writes `raw` to `path`, creating parent directories. Not atomic.
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), CrewError> {
        write_text(path.as_ref(), &self.raw)
    }
}

impl std::fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn write_text(path: &Path, text: &str) -> Result<(), CrewError> {
    let to_err = |source| CrewError::Output { path: path.display().to_string(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    std::fs::write(path, text).map_err(to_err)?;
    tracing::info!(path = %path.display(), bytes = text.len(), "output written");
    Ok(())
}

/// An ordered collection of agents and the tasks they perform.
#[derive(Debug, Clone)]
pub struct Crew {
    pub agents:          Vec<Agent>,
    pub tasks:           Vec<Task>,
    pub process:         Process,
    pub verbose:         bool,
    /// Model used by agents without their own `llm`
    pub model:           String,
    pub max_tool_rounds: usize,
}

impl Crew {
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>) -> Self {
        Self {
            agents,
            tasks,
            process:         Process::Sequential,
            verbose:         true,
            model:           DEFAULT_MODEL.to_string(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into(); self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose; self
    }

    pub fn max_tool_rounds(mut self, n: usize) -> Self {
        self.max_tool_rounds = n; self
    }

    pub async fn kickoff(&self, llm: &dyn LlmCaller) -> Result<CrewOutput, CrewError> {
        self.kickoff_with_inputs(llm, &HashMap::new()).await
    }

    /// Runs every task in order after filling `{key}` placeholders from `inputs`.
    pub async fn kickoff_with_inputs(
        &self,
        llm:    &dyn LlmCaller,
        inputs: &HashMap<String, String>,
    ) -> Result<CrewOutput, CrewError> {
        if self.tasks.is_empty() {
            return Err(CrewError::Build("crew has no tasks".to_string()));
        }

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("crew", %run_id, tasks = self.tasks.len());
        self.run(run_id, llm, inputs).instrument(span).await
    }

    async fn run(
        &self,
        run_id: Uuid,
        llm:    &dyn LlmCaller,
        inputs: &HashMap<String, String>,
    ) -> Result<CrewOutput, CrewError> {
        let mut run = RunState::default();
        tracing::info!(process = ?self.process, "crew kickoff");

        for (index, task) in self.tasks.iter().enumerate() {
            let mut task = task.clone();
            task.interpolate(inputs);

            let output = self.execute_task(index, &task, llm, &mut run).await?;

            if let Some(path) = &task.output_file {
                write_text(path, &output.raw)?;
            }
            run.outputs.push(output);
        }

        let raw = run.outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        tracing::info!(
            tasks        = run.outputs.len(),
            total_tokens = run.usage.total_tokens,
            "crew finished"
        );

        Ok(CrewOutput {
            run_id,
            raw,
            tasks_output: run.outputs,
            token_usage:  run.usage,
            trace:        run.trace,
        })
    }

    async fn execute_task(
        &self,
        index: usize,
        task:  &Task,
        llm:   &dyn LlmCaller,
        run:   &mut RunState,
    ) -> Result<TaskOutput, CrewError> {
        let tools = task.effective_tools();
        let model = wire_model(task.agent.llm.as_deref().unwrap_or(&self.model)).to_string();
        let mut convo = TaskConversation::new(task, &run.outputs);
        let mut rounds = 0;

        run.log(index, task, "TASK_START", &format!("model={} tools={:?}", model, task.agent.tool_names()));
        if self.verbose {
            println!("  ══ [{}] {} ══", task.agent.role, task.name);
        }

        let raw = loop {
            let offer_tools = !tools.is_empty() && rounds < self.max_tool_rounds;
            let request = LlmRequest {
                model:    model.clone(),
                messages: convo.messages().to_vec(),
                tools:    if offer_tools { tools.schemas() } else { Vec::new() },
            };

            let response = llm.call(&request).await.map_err(|e| {
                run.log(index, task, "LLM_ERROR", &e);
                CrewError::Llm(format!("task '{}': {}", task.name, e))
            })?;
            if let Some(usage) = response.usage() {
                run.usage.add(usage);
            }

            match response {
                LlmResponse::FinalAnswer { content, .. } => break content,
                LlmResponse::ToolCalls { tools: calls, .. } => {
                    if !offer_tools {
                        run.log(index, task, "UNEXPECTED_TOOL_CALL", &format!("{} call(s)", calls.len()));
                        return Err(CrewError::Tool(format!(
                            "task '{}': model requested tools when none were offered", task.name
                        )));
                    }
                    rounds += 1;

                    let mut results = Vec::with_capacity(calls.len());
                    for call in &calls {
                        run.log(index, task, "TOOL_CALL", &format!("tool='{}' args={:?}", call.name, call.args));
                        let result = match tools.execute(&call.name, &call.args).await {
                            Ok(out)  => ToolResult::success(call, out),
                            Err(err) => ToolResult::failure(call, err),
                        };
                        let event = if result.success { "TOOL_SUCCESS" } else { "TOOL_FAILURE" };
                        run.log(index, task, event, &result.output);
                        results.push(result);
                    }
                    convo.push_tool_round(&calls, &results);
                }
            }
        };

        run.log(index, task, "TASK_DONE", &raw.chars().take(100).collect::<String>());
        if task.agent.verbose {
            tracing::info!(task = %task.name, agent = %task.agent.role, "task output:\n{}", raw);
        }

        Ok(TaskOutput {
            name:        task.name.clone(),
            description: task.description.clone(),
            agent:       task.agent.role.clone(),
            raw,
        })
    }
}

#[derive(Default)]
struct RunState {
    outputs: Vec<TaskOutput>,
    usage:   TokenUsage,
    trace:   Trace,
}

impl RunState {
    fn log(&mut self, index: usize, task: &Task, event: &str, data: &str) {
        tracing::debug!(task = %task.name, event, data, "crew trace");
        self.trace.record(TraceEntry {
            task_index: index,
            task:       task.name.clone(),
            agent:      task.agent.role.clone(),
            event:      event.to_string(),
            data:       data.to_string(),
            timestamp:  Utc::now(),
        });
    }
}
