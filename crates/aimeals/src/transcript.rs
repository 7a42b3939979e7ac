use serde::Serialize;

use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;

/// The kind of turn a message represents in the conversation history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnRole {
    System,
    User,
    Assistant,
    ToolResult,
}

/// Conversation history for one agent invocation.
///
/// The system prompt is fixed at construction and messages can only be appended.
/// A transcript is owned by the invocation that created it and dropped with it.
#[derive(Debug, Clone)]
pub struct Transcript {
    system: String,
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new<S: Into<String>, U: Into<String>>(system: S, instruction: U) -> Self {
        Self {
            system: system.into(),
            messages: vec![Message::user().with_text(instruction)],
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of turns, counting the system prompt
    pub fn turn_count(&self) -> usize {
        self.messages.len() + 1
    }

    /// Role of every turn in order, starting with the system prompt
    pub fn turn_roles(&self) -> Vec<TurnRole> {
        std::iter::once(TurnRole::System)
            .chain(self.messages.iter().map(turn_role))
            .collect()
    }
}

fn turn_role(message: &Message) -> TurnRole {
    match message.role {
        Role::Assistant => TurnRole::Assistant,
        Role::User
            if message
                .content
                .iter()
                .any(|content| matches!(content, MessageContent::ToolResponse(_))) =>
        {
            TurnRole::ToolResult
        }
        Role::User => TurnRole::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::Content;
    use crate::models::tool::ToolCall;
    use serde_json::json;

    #[test]
    fn test_new_transcript_starts_with_system_and_instruction() {
        let transcript = Transcript::new("You plan meals.", "vegan, 2000 kcal");
        assert_eq!(transcript.system(), "You plan meals.");
        assert_eq!(transcript.turn_count(), 2);
        assert_eq!(transcript.messages()[0].text(), "vegan, 2000 kcal");
        assert_eq!(
            transcript.turn_roles(),
            vec![TurnRole::System, TurnRole::User]
        );
    }

    #[test]
    fn test_turn_roles_track_tool_rounds() {
        let mut transcript = Transcript::new("system", "plan");
        transcript.push(Message::assistant().with_tool_request(
            "1",
            Ok(ToolCall::new("search_food", json!({"query": "tofu"}))),
        ));
        transcript.push(Message::user().with_tool_response("1", Ok(vec![Content::json(json!([]))])));
        transcript.push(Message::assistant().with_text("{}"));

        assert_eq!(
            transcript.turn_roles(),
            vec![
                TurnRole::System,
                TurnRole::User,
                TurnRole::Assistant,
                TurnRole::ToolResult,
                TurnRole::Assistant,
            ]
        );
    }
}
