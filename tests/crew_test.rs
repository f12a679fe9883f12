//! Crew execution tests.
//!
//! All tests use `MockLlmCaller` — no network calls are made.

use agentcrew::llm::MockLlmCaller;
use agentcrew::{
    Agent, Crew, CrewError, FnTool, LlmResponse, Task, TokenUsage, Tool, ToolCall,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Test helpers
// ─────────────────────────────────────────────────────────────────────────────

fn agent(role: &str) -> Agent {
    Agent::new(role, format!("{} goal", role), format!("{} backstory", role)).verbose(false)
}

fn task(name: &str, agent: Agent) -> Task {
    Task::new(name, format!("Do the {} work.", name), format!("{} result", name), agent)
}

fn final_answer(content: &str) -> LlmResponse {
    LlmResponse::FinalAnswer { content: content.to_string(), usage: None }
}

fn tool_calls(names: &[&str]) -> LlmResponse {
    LlmResponse::ToolCalls {
        tools: names.iter().enumerate().map(|(i, n)| ToolCall {
            name: n.to_string(),
            args: [("query".to_string(), json!("rust"))].into(),
            id:   Some(format!("call_{}", i)),
        }).collect(),
        usage: None,
    }
}

fn counting_tool(name: &str, reply: &'static str, counter: Arc<AtomicUsize>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        name,
        "A test tool",
        json!({ "type": "object", "properties": { "query": { "type": "string" } } }),
        Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(reply.to_string())
        }),
    ))
}

fn three_step_crew() -> Crew {
    let researcher = agent("Researcher");
    let writer     = agent("Writer");
    let checker    = agent("Checker");
    Crew::new(
        vec![researcher.clone(), writer.clone(), checker.clone()],
        vec![
            task("research", researcher),
            task("summarize", writer),
            task("fact_check", checker),
        ],
    )
    .verbose(false)
    .model("test-model")
}

fn user_message(mock: &MockLlmCaller, call: usize) -> String {
    let request = mock.request(call).expect("call recorded");
    request.messages[1]["content"].as_str().unwrap().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequential execution
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tasks_run_in_order_and_last_output_is_raw() {
    let mock = MockLlmCaller::answers(["findings", "summary", "checked report"]);
    let crew = three_step_crew();

    let output = crew.kickoff(&mock).await.unwrap();

    assert_eq!(mock.call_count(), 3);
    assert_eq!(output.raw, "checked report");
    let names: Vec<_> = output.tasks_output.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["research", "summarize", "fact_check"]);
    assert_eq!(output.tasks_output[1].agent, "Writer");
}

#[tokio::test]
async fn test_earlier_outputs_are_passed_as_context() {
    let mock = MockLlmCaller::answers(["findings", "summary", "checked report"]);
    three_step_crew().kickoff(&mock).await.unwrap();

    let first  = user_message(&mock, 0);
    let third  = user_message(&mock, 2);
    assert!(!first.contains("context you're working with"));
    assert!(third.contains("findings"));
    assert!(third.contains("summary"));
    assert!(third.starts_with("Do the fact_check work."));
}

#[tokio::test]
async fn test_persona_is_the_system_message() {
    let mock = MockLlmCaller::answers(["a", "b", "c"]);
    three_step_crew().kickoff(&mock).await.unwrap();

    let request = mock.request(1).unwrap();
    assert_eq!(request.messages[0]["role"], "system");
    let system = request.messages[0]["content"].as_str().unwrap();
    assert!(system.starts_with("You are Writer."));
    assert!(system.contains("Writer goal"));
}

#[tokio::test]
async fn test_agent_model_override_wins_over_crew_model() {
    let mock = MockLlmCaller::answers(["a", "b"]);
    let local = agent("Local").llm("ollama/llama3.2");
    let crew = Crew::new(vec![], vec![task("one", agent("Default")), task("two", local)])
        .verbose(false)
        .model("gpt-4o-mini");

    crew.kickoff(&mock).await.unwrap();

    assert_eq!(mock.model_for_call(0).as_deref(), Some("gpt-4o-mini"));
    assert_eq!(mock.model_for_call(1).as_deref(), Some("llama3.2"));
}

#[tokio::test]
async fn test_crew_model_loses_ollama_prefix_on_the_wire() {
    let mock = MockLlmCaller::answers(["a"]);
    let crew = Crew::new(vec![], vec![task("one", agent("Default"))])
        .verbose(false)
        .model("ollama/llama3.2");

    crew.kickoff(&mock).await.unwrap();

    assert_eq!(mock.model_for_call(0).as_deref(), Some("llama3.2"));
}

#[tokio::test]
async fn test_inputs_fill_placeholders() {
    let mock = MockLlmCaller::answers(["done"]);
    let crew = Crew::new(vec![], vec![Task::new(
        "research",
        "Research {topic}.",
        "Notes on {topic}.",
        agent("Researcher"),
    )]).verbose(false);
    let inputs: HashMap<String, String> = [("topic".to_string(), "AI Agents".to_string())].into();

    crew.kickoff_with_inputs(&mock, &inputs).await.unwrap();

    let prompt = user_message(&mock, 0);
    assert!(prompt.starts_with("Research AI Agents."));
    assert!(prompt.contains("Notes on AI Agents."));
}

#[tokio::test]
async fn test_empty_crew_is_rejected() {
    let mock = MockLlmCaller::answers(Vec::<String>::new());
    let err = Crew::new(vec![], vec![]).kickoff(&mock).await.unwrap_err();
    assert!(matches!(err, CrewError::Build(_)));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_llm_failure_aborts_the_run() {
    let mock = MockLlmCaller::with_results(vec![
        Ok(final_answer("findings")),
        Err("OpenAI API error: 500".to_string()),
    ]);

    let err = three_step_crew().kickoff(&mock).await.unwrap_err();
    match err {
        CrewError::Llm(msg) => assert_eq!(msg, "task 'summarize': OpenAI API error: 500"),
        other => panic!("expected Llm error, got {:?}", other),
    }
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_token_usage_is_accumulated() {
    let mock = MockLlmCaller::new(vec![
        LlmResponse::FinalAnswer { content: "a".to_string(), usage: Some(TokenUsage::new(10, 20)) },
        LlmResponse::FinalAnswer { content: "b".to_string(), usage: Some(TokenUsage::new(5, 15)) },
        LlmResponse::FinalAnswer { content: "c".to_string(), usage: None },
    ]);

    let output = three_step_crew().kickoff(&mock).await.unwrap();
    assert_eq!(output.token_usage.total_tokens, 50);
    assert_eq!(output.token_usage.successful_requests, 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool rounds
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tool_call_result_reaches_the_next_call() {
    let hits = Arc::new(AtomicUsize::new(0));
    let search = counting_tool("web_search", "Rust 1.80 released", hits.clone());
    let crew = Crew::new(vec![], vec![task("research", agent("Researcher").tool(search))])
        .verbose(false);
    let mock = MockLlmCaller::new(vec![tool_calls(&["web_search"]), final_answer("Rust 1.80 is out")]);

    let output = crew.kickoff(&mock).await.unwrap();

    assert_eq!(output.raw, "Rust 1.80 is out");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let first = mock.request(0).unwrap();
    assert_eq!(first.tools.len(), 1);
    assert_eq!(first.tools[0].name, "web_search");

    let second = mock.request(1).unwrap();
    let tool_message = second.messages.last().unwrap();
    assert_eq!(tool_message["role"], "tool");
    assert_eq!(tool_message["tool_call_id"], "call_0");
    assert_eq!(tool_message["content"], "SUCCESS: Rust 1.80 released");

    assert_eq!(output.trace.events("TOOL_SUCCESS").len(), 1);
}

#[tokio::test]
async fn test_tools_are_withdrawn_after_the_round_limit() {
    let hits = Arc::new(AtomicUsize::new(0));
    let search = counting_tool("web_search", "hit", hits.clone());
    let crew = Crew::new(vec![], vec![task("research", agent("Researcher").tool(search))])
        .verbose(false)
        .max_tool_rounds(2);
    let mock = MockLlmCaller::new(vec![
        tool_calls(&["web_search"]),
        tool_calls(&["web_search", "web_search"]),
        final_answer("answer"),
    ]);

    crew.kickoff(&mock).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(mock.request(1).unwrap().tools.len(), 1);
    assert!(mock.request(2).unwrap().tools.is_empty(), "third call must not offer tools");
}

#[tokio::test]
async fn test_unknown_tool_becomes_an_error_observation() {
    let hits = Arc::new(AtomicUsize::new(0));
    let search = counting_tool("web_search", "hit", hits.clone());
    let crew = Crew::new(vec![], vec![task("research", agent("Researcher").tool(search))])
        .verbose(false);
    let mock = MockLlmCaller::new(vec![tool_calls(&["delete_everything"]), final_answer("answer")]);

    let output = crew.kickoff(&mock).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    let last = mock.request(1).unwrap().messages.last().cloned().unwrap();
    assert_eq!(last["content"], "ERROR: Tool 'delete_everything' not found in registry");
    assert_eq!(output.trace.events("TOOL_FAILURE").len(), 1);
}

#[tokio::test]
async fn test_tool_request_without_tools_is_an_error() {
    let crew = Crew::new(vec![], vec![task("write", agent("Writer"))]).verbose(false);
    let mock = MockLlmCaller::new(vec![tool_calls(&["web_search"])]);

    let err = crew.kickoff(&mock).await.unwrap_err();
    assert!(matches!(err, CrewError::Tool(_)), "got {:?}", err);
}

// ─────────────────────────────────────────────────────────────────────────────
// Output artifacts
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_task_output_file_and_markdown_report_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let task_file = dir.path().join("nested").join("research.md");
    let crew = Crew::new(vec![], vec![
        task("research", agent("Researcher")).output_file(&task_file),
    ]).verbose(false);
    let mock = MockLlmCaller::answers(["# Findings\n\n- one"]);

    let output = crew.kickoff(&mock).await.unwrap();
    assert_eq!(std::fs::read_to_string(&task_file).unwrap(), "# Findings\n\n- one");

    let report = dir.path().join("report.md");
    output.write_markdown(&report).unwrap();
    assert_eq!(std::fs::read_to_string(&report).unwrap(), output.raw);
}
