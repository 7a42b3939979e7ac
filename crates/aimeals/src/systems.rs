pub mod usda;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AgentResult;
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};

pub use usda::UsdaSystem;

/// What the system prompt shows the model about each system
#[derive(Clone, Debug, Serialize)]
pub struct SystemInfo {
    name: String,
    description: String,
    instructions: String,
}

impl SystemInfo {
    pub fn new(name: &str, description: &str, instructions: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            instructions: instructions.to_string(),
        }
    }

    pub fn of(system: &dyn System) -> Self {
        Self::new(system.name(), system.description(), system.instructions())
    }
}

/// Core trait that defines a system of tools that can be operated by an AI agent
#[async_trait]
pub trait System: Send + Sync {
    /// Get the name of the system
    fn name(&self) -> &str;

    /// Get the system description
    fn description(&self) -> &str;

    /// Get system instructions
    fn instructions(&self) -> &str;

    /// Get available tools
    fn tools(&self) -> &[Tool];

    /// Call a tool with the given parameters
    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>>;

    /// Whether this system exposes a tool with the given name
    fn has_tool(&self, name: &str) -> bool {
        self.tools().iter().any(|tool| tool.name == name)
    }
}
