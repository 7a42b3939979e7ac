use serde_json::{Deserializer, Value};
use uuid::Uuid;

use crate::formatter::extract_json_object;
use crate::models::message::{Message, ToolRequest};
use crate::models::tool::ToolCall;

const FINAL_ANSWER_ACTION: &str = "Final Answer";

/// What a single model turn asked the agent to do.
///
/// A turn is exactly one of these. When prose and a tool call arrive together the
/// tool call wins and the prose is ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    ToolCalls(Vec<ToolRequest>),
    FinalAnswer(String),
    Empty,
}

impl AgentStep {
    /// Classify a model response, returning the step and the message to record in
    /// the transcript. Text-embedded action blocks are rewritten into native tool
    /// requests so the transcript stays valid for the chat-completions format.
    pub fn interpret(response: Message) -> (AgentStep, Message) {
        let requests: Vec<ToolRequest> = response.tool_requests().into_iter().cloned().collect();
        if !requests.is_empty() {
            return (AgentStep::ToolCalls(requests), response);
        }

        let text = response.text();
        if let Some((action, input)) = parse_action_block(&text) {
            if action == FINAL_ANSWER_ACTION {
                let answer = match input {
                    Value::String(answer) => answer,
                    other => other.to_string(),
                };
                return (AgentStep::FinalAnswer(answer), response);
            }

            let id = format!("call_{}", Uuid::new_v4().simple());
            let request = ToolRequest {
                id: id.clone(),
                tool_call: Ok(ToolCall::new(action, input)),
            };
            let rewritten = Message::assistant().with_tool_request(id, request.tool_call.clone());
            return (AgentStep::ToolCalls(vec![request]), rewritten);
        }

        if text.trim().is_empty() {
            (AgentStep::Empty, response)
        } else {
            (AgentStep::FinalAnswer(text), response)
        }
    }
}

/// Find a `{"action": "...", "action_input": ...}` block anywhere in the text
fn parse_action_block(text: &str) -> Option<(String, Value)> {
    if let Some(found) = extract_json_object(text).and_then(action_from_value) {
        return Some(found);
    }

    // Prose may carry its own braces, so try every `{` as the start of a block
    text.match_indices('{').find_map(|(start, _)| {
        let mut values = Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) => action_from_value(value),
            _ => None,
        }
    })
}

fn action_from_value(value: Value) -> Option<(String, Value)> {
    let Value::Object(mut block) = value else {
        return None;
    };
    let action = block.get("action")?.as_str()?.trim().to_string();
    if action.is_empty() {
        return None;
    }
    let input = block.remove("action_input").unwrap_or(Value::Null);
    Some((action, input))
}
