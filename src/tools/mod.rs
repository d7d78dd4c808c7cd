//! Tool trait and registry.
//!
//! A tool is a named, black-box callable taking a flat JSON object of
//! arguments and returning a JSON payload. The registry is built once at
//! server construction and is read-only afterwards; listing preserves
//! insertion order, which is also the order the planner manifest is
//! rendered in.

use crate::types::{AppError, Result, ToolDefinition};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for implementing tools.
#[async_trait]
pub trait Tool: Send + Sync + std::fmt::Debug {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a description of what this tool does.
    fn description(&self) -> &str;

    /// Returns the JSON schema for this tool's arguments.
    fn parameters_schema(&self) -> Value;

    /// Executes the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<Value>;

    /// Convert to a serializable [`ToolDefinition`].
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Insertion-ordered registry of tools.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Fails with [`AppError::DuplicateTool`] if a tool
    /// with the same name is already present; silent overwrites would hide
    /// registration bugs.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(AppError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Tool>> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| AppError::UnknownTool(name.to_string()))
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        self.get(name)?.execute(args).await
    }

    /// Iterate over tools in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// Get all tool definitions in insertion order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Get tool names in insertion order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
