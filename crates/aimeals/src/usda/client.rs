use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::projection::{project_detail, project_search};

pub const USDA_HOST: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 2;
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

#[derive(Debug, Clone)]
pub struct UsdaConfig {
    pub host: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl UsdaConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: USDA_HOST.to_string(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }
}

pub struct UsdaClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl UsdaClient {
    pub fn new(config: UsdaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // Url::join replaces the last segment unless the base ends with a slash
        let mut host = config.host;
        if !host.ends_with('/') {
            host.push('/');
        }
        let base = Url::parse(&host).with_context(|| format!("Invalid USDA host: {}", host))?;

        Ok(Self {
            client,
            base,
            api_key: config.api_key,
        })
    }

    /// Search foods by name. Resolves to a list of matches or an error marker.
    pub async fn search(&self, query: &str, page_size: u32, page_number: u32) -> Value {
        let params = [
            ("query", query.to_string()),
            ("pageSize", page_size.to_string()),
            ("pageNumber", page_number.to_string()),
        ];
        match self.get("foods/search", &params).await {
            Ok(body) => json!(project_search(&body)),
            Err(marker) => marker,
        }
    }

    /// Nutrient breakdown of one food. Resolves to the detail or an error marker.
    pub async fn get_detail(&self, fdc_id: i64) -> Value {
        match self.get(&format!("food/{}", fdc_id), &[]).await {
            Ok(body) => json!(project_detail(&body)),
            Err(marker) => marker,
        }
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, Value> {
        let url = self
            .base
            .join(endpoint)
            .map_err(|e| error_marker(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        tracing::debug!(%endpoint, "querying USDA FoodData Central");
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%endpoint, error = %e, "USDA request failed");
                error_marker(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%endpoint, status = status.as_u16(), "USDA returned an error status");
            return Err(error_marker(format!("{}: {}", status.as_u16(), body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| error_marker(format!("Invalid response body: {}", e)))
    }
}

pub fn error_marker<S: Into<String>>(reason: S) -> Value {
    json!({ "error": reason.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> UsdaClient {
        UsdaClient::new(UsdaConfig {
            host: format!("{}/fdc/v1", server.uri()),
            api_key: "usda-key".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_projects_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fdc/v1/foods/search"))
            .and(query_param("query", "tofu"))
            .and(query_param("pageSize", "2"))
            .and(query_param("pageNumber", "1"))
            .and(query_param("api_key", "usda-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalHits": 1,
                "foods": [{
                    "fdcId": 12345,
                    "description": "Tofu, raw, firm",
                    "foodCategory": "Legumes and Legume Products",
                    "score": 99.5
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .search("tofu", DEFAULT_PAGE_SIZE, DEFAULT_PAGE_NUMBER)
            .await;

        assert_eq!(
            result,
            json!([{
                "description": "Tofu, raw, firm",
                "fdcId": 12345,
                "foodCategory": "Legumes and Legume Products"
            }])
        );
    }

    #[tokio::test]
    async fn test_get_detail_projects_nutrients() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fdc/v1/food/12345"))
            .and(query_param("api_key", "usda-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fdcId": 12345,
                "description": "Tofu, raw, firm",
                "foodNutrients": [
                    {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 17.3},
                    {"nutrient": {"name": "Sugars"}, "amount": null}
                ]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).get_detail(12345).await;

        assert_eq!(
            result,
            json!({
                "description": "Tofu, raw, firm",
                "nutrients": [{"name": "Protein", "amount": 17.3, "unit": "g"}]
            })
        );
    }

    #[tokio::test]
    async fn test_error_status_becomes_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API_KEY_INVALID"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.search("tofu", 2, 1).await,
            json!({"error": "403: API_KEY_INVALID"})
        );
        assert_eq!(
            client.get_detail(1).await,
            json!({"error": "403: API_KEY_INVALID"})
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_becomes_marker() {
        let client = UsdaClient::new(UsdaConfig {
            host: "http://127.0.0.1:9".to_string(),
            api_key: "usda-key".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        let result = client.search("tofu", 2, 1).await;
        assert!(result["error"].is_string());
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        assert!(UsdaClient::new(UsdaConfig {
            host: "not a url".to_string(),
            api_key: String::new(),
            timeout_secs: 1,
        })
        .is_err());
    }
}
