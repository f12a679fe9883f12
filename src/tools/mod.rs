use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

mod currency;
mod search;

pub use currency::{
    Conversion, ConversionError, ConversionRequest, CurrencyConverterTool,
    HttpRateSource, RateSource, RatesResponse,
};
pub use search::{SearchResult, SerperSearchTool};

/// A closure tool: takes JSON args, returns string result or error string.
pub type ToolFn = Box<dyn Fn(&HashMap<String, Value>) -> Result<String, String> + Send + Sync>;

/// Tool schema for sending to LLM (OpenAI tool format)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ToolSchema {
    pub name:         String,
    pub description:  String,
    pub input_schema: Value,   // JSON Schema object
}

/// A capability an agent may invoke mid-task.
///
/// `execute` returns `Ok(text)` or `Err(text)`; either way the text is what
/// the model reads as the observation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// What the tool does and when to use it. Sent to the model verbatim.
    fn description(&self) -> &str;

    fn input_schema(&self) -> Value;

    async fn execute(&self, args: &HashMap<String, Value>) -> Result<String, String>;

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name:         self.name().to_string(),
            description:  self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tool({})", self.name())
    }
}

/// Wraps a synchronous closure as a `Tool`.
pub struct FnTool {
    schema: ToolSchema,
    func:   ToolFn,
}

impl FnTool {
    pub fn new(
        name:        impl Into<String>,
        description: impl Into<String>,
        schema:      Value,
        func:        ToolFn,
    ) -> Self {
        Self {
            schema: ToolSchema {
                name:         name.into(),
                description:  description.into(),
                input_schema: schema,
            },
            func,
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str { &self.schema.name }
    fn description(&self) -> &str { &self.schema.description }
    fn input_schema(&self) -> Value { self.schema.input_schema.clone() }

    async fn execute(&self, args: &HashMap<String, Value>) -> Result<String, String> {
        (self.func)(args)
    }
}

/// Tools available to one task, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(i) => self.tools[i] = tool,
            None    => self.tools.push(tool),
        }
    }

    /// Execute a named tool with given arguments.
    /// Returns Ok(result_string) or Err(error_string).
    /// Never panics — all errors are captured as Err variants.
    pub async fn execute(&self, name: &str, args: &HashMap<String, Value>) -> Result<String, String> {
        match self.tools.iter().find(|t| t.name() == name) {
            Some(tool) => {
                tracing::debug!(tool = name, "executing tool");
                let result = tool.execute(args).await;
                if let Err(e) = &result {
                    tracing::warn!(tool = name, error = %e, "tool reported failure");
                }
                result
            }
            None => Err(format!("Tool '{}' not found in registry", name)),
        }
    }

    /// Returns true if a tool with this name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Returns all tool schemas — used to build the tools array for LLM calls.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<Arc<dyn Tool>> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Tool>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for tool in iter {
            registry.register(tool);
        }
        registry
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tools.iter().map(|t| t.name())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo(name: &str, reply: &'static str) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(name, "test tool", json!({"type": "object"}),
            Box::new(move |_| Ok(reply.to_string()))))
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_not_a_panic() {
        let registry = ToolRegistry::new();
        let err = registry.execute("missing", &HashMap::new()).await.unwrap_err();
        assert_eq!(err, "Tool 'missing' not found in registry");
    }

    #[tokio::test]
    async fn same_name_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("a", "first"));
        registry.register(echo("b", "b"));
        registry.register(echo("a", "second"));

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.execute("a", &HashMap::new()).await.unwrap(), "second");
    }
}
