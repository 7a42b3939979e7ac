use serde::{Deserialize, Serialize};

/// The author of a message in the transcript.
///
/// The system prompt travels separately from the messages, and tool results are
/// user messages carrying tool responses, so two roles are enough here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}
