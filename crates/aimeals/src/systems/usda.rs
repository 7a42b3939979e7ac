use async_trait::async_trait;
use serde_json::{json, Value};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};
use crate::systems::System;
use crate::usda::client::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::usda::UsdaClient;

/// The tools the nutrition system answers to
#[derive(EnumIter, EnumString, AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum UsdaTool {
    SearchFood,
    GetNutrients,
}

/// Nutrition lookups against USDA FoodData Central, exposed as agent tools
pub struct UsdaSystem {
    tools: Vec<Tool>,
    client: UsdaClient,
}

impl UsdaSystem {
    pub fn new(client: UsdaClient) -> Self {
        let search_food = Tool::new(
            UsdaTool::SearchFood.as_ref(),
            "Search USDA database for foods. Input is a food name (string). \
            Output is a list of matching foods with description, fdcId, and category.",
            json!({
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The food name to search for, e.g. \"firm tofu\"."
                    }
                }
            }),
        );

        let get_nutrients = Tool::new(
            UsdaTool::GetNutrients.as_ref(),
            "Get nutrient details for a given food using its fdcId.",
            json!({
                "type": "object",
                "required": ["fdc_id"],
                "properties": {
                    "fdc_id": {
                        "type": "integer",
                        "description": "The fdcId of a food returned by search_food."
                    }
                }
            }),
        );

        Self {
            tools: vec![search_food, get_nutrients],
            client,
        }
    }

    async fn search_food(&self, arguments: &Value) -> AgentResult<Value> {
        let query = query_argument(arguments)?;
        Ok(self
            .client
            .search(&query, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_NUMBER)
            .await)
    }

    async fn get_nutrients(&self, arguments: &Value) -> AgentResult<Value> {
        let fdc_id = fdc_id_argument(arguments)?;
        Ok(self.client.get_detail(fdc_id).await)
    }
}

/// `search_food` takes `{"query": "..."}` or a bare string
fn query_argument(arguments: &Value) -> AgentResult<String> {
    let query = match arguments {
        Value::String(query) => Some(query.as_str()),
        Value::Object(map) => map.get("query").and_then(Value::as_str),
        _ => None,
    }
    .map(str::trim)
    .filter(|query| !query.is_empty())
    .ok_or_else(|| AgentError::InvalidParameters("query must be a non-empty string".into()))?;

    Ok(query.to_string())
}

/// `get_nutrients` takes `{"fdc_id": n}`, `{"fdcId": n}`, a bare number or a numeric string
fn fdc_id_argument(arguments: &Value) -> AgentResult<i64> {
    let raw = match arguments {
        Value::Object(map) => map.get("fdc_id").or_else(|| map.get("fdcId")),
        other => Some(other),
    };

    raw.and_then(|value| match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => i64::from_str(s.trim()).ok(),
        _ => None,
    })
    .ok_or_else(|| {
        AgentError::InvalidParameters(format!("fdc_id must be an integer, got {}", arguments))
    })
}

#[async_trait]
impl System for UsdaSystem {
    fn name(&self) -> &str {
        "usda"
    }

    fn description(&self) -> &str {
        "Food search and nutrient data from USDA FoodData Central"
    }

    fn instructions(&self) -> &str {
        "Use search_food to find candidate items by name, then get_nutrients with the \
        chosen fdcId to read verified nutrient values."
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>> {
        let tool = UsdaTool::from_str(&tool_call.name)
            .map_err(|_| AgentError::ToolNotFound(tool_call.name.clone()))?;

        let result = match tool {
            UsdaTool::SearchFood => self.search_food(&tool_call.arguments).await?,
            UsdaTool::GetNutrients => self.get_nutrients(&tool_call.arguments).await?,
        };
        Ok(vec![Content::json(result)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usda::UsdaConfig;
    use strum::IntoEnumIterator;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn system_for(server: &MockServer) -> UsdaSystem {
        let client = UsdaClient::new(UsdaConfig {
            host: server.uri(),
            api_key: "usda-key".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        UsdaSystem::new(client)
    }

    #[test]
    fn test_tool_catalog_matches_enum() {
        let system = UsdaSystem::new(UsdaClient::new(UsdaConfig::new("k")).unwrap());
        let names: Vec<_> = system.tools().iter().map(|t| t.name.as_str()).collect();
        let expected: Vec<_> = UsdaTool::iter().map(|t| t.as_ref().to_string()).collect();
        assert_eq!(names, expected);
        assert_eq!(names, vec!["search_food", "get_nutrients"]);
        assert!(system.has_tool("get_nutrients"));
        assert!(!system.has_tool("lookup_recipe"));
    }

    #[test]
    fn test_query_argument_shapes() {
        assert_eq!(query_argument(&json!({"query": " tofu "})).unwrap(), "tofu");
        assert_eq!(query_argument(&json!("oat milk")).unwrap(), "oat milk");
        assert!(matches!(
            query_argument(&json!({"query": ""})),
            Err(AgentError::InvalidParameters(_))
        ));
        assert!(query_argument(&json!(42)).is_err());
    }

    #[test]
    fn test_fdc_id_argument_shapes() {
        assert_eq!(fdc_id_argument(&json!({"fdc_id": 12345})).unwrap(), 12345);
        assert_eq!(fdc_id_argument(&json!({"fdcId": "12345"})).unwrap(), 12345);
        assert_eq!(fdc_id_argument(&json!(12345)).unwrap(), 12345);
        assert_eq!(fdc_id_argument(&json!(" 12345 ")).unwrap(), 12345);
        assert!(matches!(
            fdc_id_argument(&json!({"fdc_id": "tofu"})),
            Err(AgentError::InvalidParameters(_))
        ));
        assert!(fdc_id_argument(&json!({"id": 1.5})).is_err());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = MockServer::start().await;
        let system = system_for(&server);

        let error = system
            .call(ToolCall::new("lookup_recipe", json!({})))
            .await
            .unwrap_err();
        assert_eq!(error, AgentError::ToolNotFound("lookup_recipe".into()));
    }

    #[tokio::test]
    async fn test_search_food_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .and(query_param("query", "tofu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "foods": [{"fdcId": 12345, "description": "Tofu, raw, firm", "ndbNumber": "16427"}]
            })))
            .mount(&server)
            .await;

        let result = system_for(&server)
            .call(ToolCall::new("search_food", json!({"query": "tofu"})))
            .await
            .unwrap();

        assert_eq!(
            result,
            vec![Content::json(json!([
                {"description": "Tofu, raw, firm", "fdcId": 12345, "foodCategory": null}
            ]))]
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_a_value_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/food/999"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let result = system_for(&server)
            .call(ToolCall::new("get_nutrients", json!({"fdc_id": 999})))
            .await
            .unwrap();

        assert_eq!(result, vec![Content::json(json!({"error": "404: not found"}))]);
    }
}
