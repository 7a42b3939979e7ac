use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::message::Message;
use crate::prompt_template::load_prompt_file;
use crate::providers::configs::ProviderConfig;
use crate::providers::factory::get_provider;

const INGREDIENTS_MARKER: &str = "INGREDIENTS:";
const INSTRUCTIONS_MARKER: &str = "INSTRUCTIONS:";
const RECIPE_TEMPERATURE: f32 = 0.3;
const RECIPE_MAX_TOKENS: i32 = 1000;

lazy_static! {
    static ref BULLET: Regex = Regex::new(r"^[-•]\s*").unwrap();
    static ref STEP_MARKER: Regex = Regex::new(r"^(?:\d+\.\s|[-•]\s*)").unwrap();
    static ref NUMBERED: Regex = Regex::new(r"^\d+\.").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientsSection {
    pub heading: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructionsSection {
    pub heading: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeResponse {
    pub success: bool,
    pub meal_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub ingredients: IngredientsSection,
    pub instructions: InstructionsSection,
}

impl RecipeResponse {
    fn new(meal_name: &str, items: Vec<String>, steps: Vec<String>) -> Self {
        let name = title_case(meal_name);
        Self {
            success: true,
            error: None,
            ingredients: IngredientsSection {
                heading: format!("Ingredients for {}", name),
                items,
            },
            instructions: InstructionsSection {
                heading: format!("How to Make {}", name),
                steps,
            },
            meal_name: name,
        }
    }

    pub fn error<S: Into<String>>(meal_name: &str, error: S) -> Self {
        let mut response = Self::new(
            meal_name,
            vec!["Error: Could not fetch ingredients".to_string()],
            vec!["Error: Could not fetch instructions".to_string()],
        );
        response.success = false;
        response.error = Some(error.into());
        response
    }
}

/// Ask the model for a recipe and split its reply into ingredients and steps
pub async fn generate_recipe(config: &ProviderConfig, meal_name: &str) -> RecipeResponse {
    match request_recipe(config, meal_name).await {
        Ok(text) => parse_recipe(&text, meal_name),
        Err(e) => {
            tracing::warn!(%meal_name, error = %e, "recipe generation failed");
            RecipeResponse::error(meal_name, e.to_string())
        }
    }
}

async fn request_recipe(config: &ProviderConfig, meal_name: &str) -> Result<String> {
    let provider = get_provider(config.with_sampling(Some(RECIPE_TEMPERATURE), Some(RECIPE_MAX_TOKENS)))?;

    let mut context = HashMap::new();
    context.insert("meal_name", meal_name);
    let system = load_prompt_file("recipe_system.md", &context)?;
    let prompt = load_prompt_file("recipe.md", &context)?;

    let (reply, _usage) = provider
        .complete(&system, &[Message::user().with_text(prompt)], &[])
        .await?;

    let text = reply.text();
    if text.trim().is_empty() {
        return Err(anyhow!("Empty response from model"));
    }
    Ok(text)
}

pub fn parse_recipe(text: &str, meal_name: &str) -> RecipeResponse {
    let ingredients = parse_ingredients(extract_section(text, INGREDIENTS_MARKER, Some(INSTRUCTIONS_MARKER)));
    let steps = parse_instructions(extract_section(text, INSTRUCTIONS_MARKER, None));
    RecipeResponse::new(meal_name, ingredients, steps)
}

/// Text after `start` up to `end` (or the end of input), trimmed
fn extract_section<'a>(text: &'a str, start: &str, end: Option<&str>) -> &'a str {
    let Some(idx) = text.find(start) else {
        return "";
    };
    let rest = &text[idx + start.len()..];
    let section = match end.and_then(|end| rest.find(end)) {
        Some(end_idx) => &rest[..end_idx],
        None => rest,
    };
    section.trim()
}

fn parse_ingredients(section: &str) -> Vec<String> {
    let items: Vec<String> = section
        .lines()
        .map(|line| BULLET.replace(line.trim(), "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        vec!["No ingredients found".to_string()]
    } else {
        items
    }
}

fn parse_instructions(section: &str) -> Vec<String> {
    let steps: Vec<String> = section
        .lines()
        .map(str::trim)
        .filter(|line| NUMBERED.is_match(line) || line.starts_with('-') || line.starts_with('•'))
        .map(|line| STEP_MARKER.replace(line, "").trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();

    if steps.is_empty() {
        vec!["No instructions found".to_string()]
    } else {
        steps
    }
}

/// Uppercase the first letter of every word and lowercase the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::configs::OpenAiProviderConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REPLY: &str = "Sure!\n\nINGREDIENTS:\n- 200g firm tofu\n• 1 tbsp olive oil\n\n- 1/2 tsp turmeric\n\nINSTRUCTIONS:\n1. Crumble the tofu.\n2. Fry in oil for 5 minutes.\nServe hot.\n- Season to taste.";

    #[test]
    fn test_parse_recipe_sections() {
        let recipe = parse_recipe(REPLY, "tofu scramble");
        assert!(recipe.success);
        assert_eq!(recipe.meal_name, "Tofu Scramble");
        assert_eq!(recipe.ingredients.heading, "Ingredients for Tofu Scramble");
        assert_eq!(
            recipe.ingredients.items,
            vec!["200g firm tofu", "1 tbsp olive oil", "1/2 tsp turmeric"]
        );
        assert_eq!(recipe.instructions.heading, "How to Make Tofu Scramble");
        assert_eq!(
            recipe.instructions.steps,
            vec![
                "Crumble the tofu.",
                "Fry in oil for 5 minutes.",
                "Season to taste."
            ]
        );
    }

    #[test]
    fn test_step_starting_with_decimal_is_kept_whole() {
        let text = "INGREDIENTS:\n- tofu\nINSTRUCTIONS:\n1. Press the tofu.\n1.5 hours later, drain it.";
        let recipe = parse_recipe(text, "tofu");
        assert_eq!(
            recipe.instructions.steps,
            vec!["Press the tofu.", "1.5 hours later, drain it."]
        );
    }

    #[test]
    fn test_parse_recipe_without_markers() {
        let recipe = parse_recipe("I don't know that dish.", "mystery stew");
        assert_eq!(recipe.ingredients.items, vec!["No ingredients found"]);
        assert_eq!(recipe.instructions.steps, vec!["No instructions found"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("chickpea CURRY with rice"), "Chickpea Curry With Rice");
        assert_eq!(title_case("mac-and-cheese"), "Mac-And-Cheese");
    }

    #[test]
    fn test_error_response_shape() {
        let value = serde_json::to_value(RecipeResponse::error("pad thai", "boom")).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "meal_name": "Pad Thai",
                "error": "boom",
                "ingredients": {
                    "heading": "Ingredients for Pad Thai",
                    "items": ["Error: Could not fetch ingredients"]
                },
                "instructions": {
                    "heading": "How to Make Pad Thai",
                    "steps": ["Error: Could not fetch instructions"]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_generate_recipe_uses_recipe_sampling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"max_tokens": 1000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": REPLY}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig::OpenAi(OpenAiProviderConfig {
            host: server.uri(),
            ..OpenAiProviderConfig::new("sk-test")
        });
        let recipe = generate_recipe(&config, "tofu scramble").await;
        assert!(recipe.success);
        assert_eq!(recipe.ingredients.items.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_recipe_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "bad key", "code": "invalid_api_key"}
            })))
            .mount(&server)
            .await;

        let config = ProviderConfig::OpenAi(OpenAiProviderConfig {
            host: server.uri(),
            ..OpenAiProviderConfig::new("sk-bad")
        });
        let recipe = generate_recipe(&config, "tofu scramble").await;
        assert!(!recipe.success);
        assert!(recipe.error.unwrap().contains("401"));
    }
}
