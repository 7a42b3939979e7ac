use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while interpreting or executing a tool call.
///
/// These never abort the agent loop. They are carried inside the transcript so the
/// model can read them and correct itself on the next turn.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
