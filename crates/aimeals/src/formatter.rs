use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

lazy_static! {
    static ref LEADING_FENCE: Regex = Regex::new(r"^```(?:json)?\s*").unwrap();
    static ref TRAILING_FENCE: Regex = Regex::new(r"\s*```$").unwrap();
}

/// The agent's final answer, shaped for consumers.
///
/// Serializes as the parsed object itself, or as `{"unstructured": "<raw text>"}`
/// when the model did not produce parseable JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MealPlan {
    Structured(Map<String, Value>),
    Unstructured { unstructured: String },
}

impl MealPlan {
    pub fn is_structured(&self) -> bool {
        matches!(self, MealPlan::Structured(_))
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            MealPlan::Structured(map) => Some(map),
            MealPlan::Unstructured { .. } => None,
        }
    }
}

/// Shape the agent's raw final text into a [`MealPlan`].
///
/// The first `{` through the last `}` is parsed as a JSON object. Anything else,
/// including a parse failure, keeps the original text untouched.
pub fn format_meal_plan(text: &str) -> MealPlan {
    match extract_json_object(text) {
        Some(Value::Object(map)) => MealPlan::Structured(map),
        _ => {
            tracing::debug!("final answer is not structured, passing raw text through");
            MealPlan::Unstructured {
                unstructured: text.to_string(),
            }
        }
    }
}

/// Remove a surrounding Markdown code fence, if any
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    TRAILING_FENCE.replace(&without_leading, "").to_string()
}

/// Parse the outermost `{ ... }` span of `text` as JSON
pub fn extract_json_object(text: &str) -> Option<Value> {
    let text = strip_code_fences(text);
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&text) {
        return Some(value);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}
