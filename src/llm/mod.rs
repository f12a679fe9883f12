use crate::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;

pub mod connection;
mod openai;
mod mock;
mod retry;

pub use openai::OpenAiCaller;
pub use mock::MockLlmCaller;
pub use retry::RetryingLlmCaller;

/// The single interface between a crew and any LLM provider.
///
/// # Contract
/// - Must be Send + Sync (shared by every agent in a crew)
/// - Returns Ok(LlmResponse) on any valid LLM interaction
/// - Returns Err(String) ONLY for unrecoverable failures:
///   - Network failure
///   - Authentication failure
///   - Response unparseable as LlmResponse
/// - MUST send `request.tools` with the call when non-empty
#[async_trait]
pub trait LlmCaller: Send + Sync {
    async fn call(&self, request: &LlmRequest) -> Result<LlmResponse, String>;
}

#[async_trait]
impl<T: LlmCaller + ?Sized> LlmCaller for std::sync::Arc<T> {
    async fn call(&self, request: &LlmRequest) -> Result<LlmResponse, String> {
        (**self).call(request).await
    }
}
