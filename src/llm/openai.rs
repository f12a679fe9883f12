use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall,
        ChatCompletionRequestMessage,
        ChatCompletionTool,
        ChatCompletionToolArgs,
        ChatCompletionToolType,
        CreateChatCompletionRequestArgs,
        FunctionObjectArgs,
    },
    Client,
};
use async_trait::async_trait;
use crate::llm::LlmCaller;
use crate::settings::LlmSettings;
use crate::tools::ToolSchema;
use crate::types::{LlmRequest, LlmResponse, ToolCall};
use crate::usage::TokenUsage;
use std::collections::HashMap;

pub struct OpenAiCaller {
    client: Client<OpenAIConfig>,
}

impl OpenAiCaller {
    /// Client for whatever backend the settings select. Ollama ignores the
    /// key but the client still sends one.
    pub fn from_settings(settings: &LlmSettings) -> Self {
        let mut config = OpenAIConfig::new()
            .with_api_key(settings.api_key.clone().unwrap_or_else(|| "ollama".to_string()));
        if let Some(base) = settings.api_base() {
            config = config.with_api_base(base);
        }
        Self { client: Client::with_config(config) }
    }

    /// Convert our ToolSchema into async-openai's ChatCompletionTool type
    fn build_tools(tools: &[ToolSchema]) -> Result<Vec<ChatCompletionTool>, String> {
        tools.iter().map(|schema| {
            let function = FunctionObjectArgs::default()
                .name(schema.name.clone())
                .description(schema.description.clone())
                .parameters(schema.input_schema.clone())
                .build()
                .map_err(|e| format!("Failed to build tool '{}': {}", schema.name, e))?;
            ChatCompletionToolArgs::default()
                .r#type(ChatCompletionToolType::Function)
                .function(function)
                .build()
                .map_err(|e| format!("Failed to build tool '{}': {}", schema.name, e))
        }).collect()
    }

    /// Parse one tool call from an OpenAI response into our ToolCall type
    fn parse_tool_call(tc: &ChatCompletionMessageToolCall) -> Result<ToolCall, String> {
        let args: HashMap<String, serde_json::Value> =
            serde_json::from_str(&tc.function.arguments)
                .map_err(|e| format!("Failed to parse tool args: {}", e))?;
        Ok(ToolCall {
            name: tc.function.name.clone(),
            args,
            id: Some(tc.id.clone()),
        })
    }
}

#[async_trait]
impl LlmCaller for OpenAiCaller {
    async fn call(&self, request: &LlmRequest) -> Result<LlmResponse, String> {
        // Messages are kept as OpenAI-format JSON; serde gives us the typed form.
        let messages: Vec<ChatCompletionRequestMessage> =
            serde_json::from_value(serde_json::Value::Array(request.messages.clone()))
                .map_err(|e| format!("Failed to build messages: {}", e))?;

        let oai_tools = Self::build_tools(&request.tools)?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder.model(request.model.as_str()).messages(messages);

        if !oai_tools.is_empty() {
            request_builder.tools(oai_tools);
        }

        let oai_request = request_builder.build()
            .map_err(|e| format!("Failed to build request: {}", e))?;

        tracing::debug!(model = %request.model, tools = request.tools.len(), "chat completion request");

        let response = self.client.chat()
            .create(oai_request)
            .await
            .map_err(|e| format!("OpenAI API error: {}", e))?;

        let usage = response.usage.map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

        let choice = response.choices.into_iter().next()
            .ok_or("Empty response from OpenAI")?;

        let message = choice.message;

        // Tool calls take priority over text content
        if let Some(tool_calls) = message.tool_calls.filter(|calls| !calls.is_empty()) {
            let tools = tool_calls.iter()
                .map(Self::parse_tool_call)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(LlmResponse::ToolCalls { tools, usage });
        }

        let content = message.content
            .ok_or("No content in OpenAI response")?;

        Ok(LlmResponse::FinalAnswer { content, usage })
    }
}
