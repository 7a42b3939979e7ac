use anyhow::{anyhow, Context, Result};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::formatter::extract_json_object;
use crate::models::message::Message;
use crate::prompt_template::load_prompt_file;
use crate::providers::configs::ProviderConfig;
use crate::providers::factory::get_provider;

pub const SHOPPING_CATEGORIES: [&str; 6] = [
    "Vegetables and Herbs",
    "Proteins",
    "Fruits",
    "Dairy",
    "Dry Goods and Grains",
    "Snacks and Others",
];

const SHOPPING_TEMPERATURE: f32 = 0.2;

/// Items grouped by category, with the fixed categories first in their listed order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingList {
    categories: Vec<(String, Vec<String>)>,
}

impl ShoppingList {
    fn from_map(mut map: BTreeMap<String, Vec<String>>) -> Self {
        let mut categories: Vec<(String, Vec<String>)> = SHOPPING_CATEGORIES
            .iter()
            .map(|category| (category.to_string(), map.remove(*category).unwrap_or_default()))
            .collect();
        categories.extend(map);
        Self { categories }
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, items)| items.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Serialize for ShoppingList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.categories.iter().map(|(name, items)| (name, items)))
    }
}

/// Aggregate a week of meals into a categorised shopping list
pub async fn generate_shopping_list(config: &ProviderConfig, week: &Value) -> Result<ShoppingList> {
    let provider = get_provider(config.with_sampling(Some(SHOPPING_TEMPERATURE), None))?;

    let system = load_prompt_file("shopping_list.md", &json!({ "categories": SHOPPING_CATEGORIES }))?;
    let week_text = serde_json::to_string_pretty(week)?;
    let prompt = load_prompt_file("shopping_request.md", &json!({ "week": week_text }))?;

    let (reply, _usage) = provider
        .complete(&system, &[Message::user().with_text(prompt)], &[])
        .await
        .context("Shopping list generation failed")?;

    parse_shopping_list(&reply.text()).context("Shopping list generation failed")
}

/// Parse the model's reply, making sure every category is present
pub fn parse_shopping_list(text: &str) -> Result<ShoppingList> {
    let value = extract_json_object(text).ok_or_else(|| anyhow!("reply contained no JSON object"))?;
    let map: BTreeMap<String, Vec<String>> =
        serde_json::from_value(value).context("reply did not map categories to item lists")?;
    Ok(ShoppingList::from_map(map))
}
