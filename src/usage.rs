use serde::{Deserialize, Serialize};

/// Token counts for a single LLM call or a whole crew run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens:     u32,
    pub completion_tokens: u32,
    pub total_tokens:      u32,
    /// Number of model calls folded into this value
    pub successful_requests: u32,
}

impl TokenUsage {
    pub fn new(prompt: u32, completion: u32) -> Self {
        Self {
            prompt_tokens:       prompt,
            completion_tokens:   completion,
            total_tokens:        prompt + completion,
            successful_requests: 1,
        }
    }

    /// Accumulate usage from another call
    pub fn add(&mut self, other: TokenUsage) {
        self.prompt_tokens       += other.prompt_tokens;
        self.completion_tokens   += other.completion_tokens;
        self.total_tokens        += other.total_tokens;
        self.successful_requests += other.successful_requests;
    }
}
