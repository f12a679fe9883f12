use std::sync::Mutex;
use crate::llm::LlmCaller;
use crate::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;

/// Replays programmed responses in order and records every request.
pub struct MockLlmCaller {
    responses: Mutex<Vec<Result<LlmResponse, String>>>,
    call_log:  Mutex<Vec<LlmRequest>>,
}

impl MockLlmCaller {
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    /// Like `new`, but individual calls may fail.
    pub fn with_results(results: Vec<Result<LlmResponse, String>>) -> Self {
        Self {
            responses: Mutex::new(results),
            call_log:  Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a sequence of plain final answers.
    pub fn answers<S: Into<String>>(answers: impl IntoIterator<Item = S>) -> Self {
        Self::new(answers.into_iter()
            .map(|a| LlmResponse::FinalAnswer { content: a.into(), usage: None })
            .collect())
    }

    /// Returns the number of times call() was invoked
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Returns the model string passed to the Nth call (0-indexed)
    pub fn model_for_call(&self, n: usize) -> Option<String> {
        self.call_log.lock().unwrap()
            .get(n)
            .map(|r| r.model.clone())
    }

    /// Returns a copy of the Nth request (0-indexed)
    pub fn request(&self, n: usize) -> Option<LlmRequest> {
        self.call_log.lock().unwrap().get(n).cloned()
    }
}

#[async_trait]
impl LlmCaller for MockLlmCaller {
    async fn call(&self, request: &LlmRequest) -> Result<LlmResponse, String> {
        self.call_log.lock().unwrap().push(request.clone());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err("MockLlmCaller: no more programmed responses".to_string());
        }
        responses.remove(0)
    }
}
