//! Tool trait and dispatch registry.
//!
//! The registry maps a tool name to an executable function and its argument
//! schema. It is assembled once at startup and read-only afterwards, so the
//! conversation loop can share it without locking.

use crate::error::{Result, ToolkitError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// An executable, schema-bound tool the model may call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as advertised to the model.
    fn name(&self) -> &str;

    /// Description the model uses to decide when to call this tool.
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn schema(&self) -> Value;

    /// Execute with already-validated arguments.
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Name-indexed registry of tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its own name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Whether a tool is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// The argument schema of a registered tool.
    pub fn schema(&self, name: &str) -> Option<Value> {
        self.get(name).map(Tool::schema)
    }

    /// All registered tool names.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Intersect a suggestion list with what is actually registered,
    /// preserving suggestion order.
    ///
    /// A handler can never advertise a tool the runtime cannot execute.
    pub fn known<'a, S: AsRef<str>>(&self, suggested: &'a [S]) -> Vec<&'a str> {
        suggested
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.has(name))
            .collect()
    }

    /// Execute a tool by name.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolkitError::NotFound(name.to_string()))?;

        debug!(tool = name, "dispatching tool");
        tool.execute(args).await
    }
}
