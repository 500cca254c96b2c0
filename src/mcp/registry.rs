//! Tool registry
//!
//! Maps tool names to their definitions and async handlers. Listing order is
//! registration order.

use futures::future::{BoxFuture, FutureExt};
use rmcp::model::{CallToolResult, JsonObject, Tool};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::ToolError;

/// Async handler invoked with the call's arguments
pub type ToolHandler =
    Arc<dyn Fn(JsonObject) -> BoxFuture<'static, Result<CallToolResult, ToolError>> + Send + Sync>;

/// Registered tools, in registration order
#[derive(Clone, Default)]
pub struct ToolRegistry {
    entries: Vec<(Tool, ToolHandler)>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(tool, _)| &tool.name))
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tool` with its handler, replacing any tool of the same name
    pub fn register_tool_handler<F, Fut>(&mut self, tool: Tool, handler: F)
    where
        F: Fn(JsonObject) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, ToolError>> + Send + 'static,
    {
        let handler: ToolHandler = Arc::new(move |arguments| handler(arguments).boxed());
        match self.entries.iter_mut().find(|(existing, _)| existing.name == tool.name) {
            Some(entry) => *entry = (tool, handler),
            None => self.entries.push((tool, handler)),
        }
    }

    /// Definitions of all registered tools
    pub fn tools(&self) -> Vec<Tool> {
        self.entries.iter().map(|(tool, _)| tool.clone()).collect()
    }

    /// Dispatch a call by tool name
    ///
    /// Absent arguments are passed to the handler as an empty object.
    #[instrument(skip(self, arguments))]
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let handler = self
            .entries
            .iter()
            .find(|(tool, _)| tool.name == name)
            .map(|(_, handler)| handler.clone())
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        debug!("Dispatching tool call");
        handler(arguments.unwrap_or_default()).await
    }
}
