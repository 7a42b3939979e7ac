use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One hit from a food search, reduced to what the model needs to pick an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodMatch {
    pub description: String,
    pub fdc_id: i64,
    pub food_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDetail {
    pub description: Option<String>,
    pub nutrients: Vec<Nutrient>,
}

/// Project a `/foods/search` body onto the allow-listed fields.
///
/// Entries without a description or an integer `fdcId` are skipped.
pub fn project_search(body: &Value) -> Vec<FoodMatch> {
    body.get("foods")
        .and_then(Value::as_array)
        .map(|foods| {
            foods
                .iter()
                .filter_map(|food| {
                    Some(FoodMatch {
                        description: food.get("description")?.as_str()?.to_string(),
                        fdc_id: food.get("fdcId")?.as_i64()?,
                        food_category: food
                            .get("foodCategory")
                            .and_then(Value::as_str)
                            .map(String::from),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Project a `/food/{id}` body, dropping nutrients missing a name or a numeric amount.
pub fn project_detail(body: &Value) -> FoodDetail {
    let nutrients = body
        .get("foodNutrients")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(project_nutrient).collect())
        .unwrap_or_default();

    FoodDetail {
        description: body
            .get("description")
            .and_then(Value::as_str)
            .map(String::from),
        nutrients,
    }
}

fn project_nutrient(entry: &Value) -> Option<Nutrient> {
    let nutrient = entry.get("nutrient")?;
    let name = nutrient.get("name")?.as_str()?;
    if name.is_empty() {
        return None;
    }
    Some(Nutrient {
        name: name.to_string(),
        amount: entry.get("amount")?.as_f64()?,
        unit: nutrient
            .get("unitName")
            .and_then(Value::as_str)
            .map(String::from),
    })
}
