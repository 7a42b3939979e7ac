use crate::state::AppState;
use aimeals::planner::{MealPlanRequest, MealPlanResponse};
use axum::{extract::State, routing::post, Json, Router};

async fn generate(
    State(state): State<AppState>,
    Json(request): Json<MealPlanRequest>,
) -> Json<MealPlanResponse> {
    tracing::info!("generating meal plan");
    Json(state.planner.generate(&request).await)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app_for, completion, post_json, send};
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_meal_plan() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                r#"{"Breakfast": {"items": ["oats"]}, "Lunch": {}, "Dinner": {}, "Snacks": {}}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let (status, body) = send(
            app_for(&server),
            post_json(
                "/api/v1/meal-planning/generate",
                &json!({"user_profile": "vegan, 2000 kcal", "dietary_preferences": "no soy"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Meal plan generated successfully");
        assert_eq!(body["meal_plan"]["Breakfast"], json!({"items": ["oats"]}));
    }

    #[tokio::test]
    async fn test_generate_meal_plan_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (status, body) = send(
            app_for(&server),
            post_json("/api/v1/meal-planning/generate", &json!({"user_profile": "vegan"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["meal_plan"], serde_json::Value::Null);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error generating meal plan: "));
    }

    #[tokio::test]
    async fn test_missing_profile_is_rejected() {
        let server = MockServer::start().await;
        let (status, _) = send(
            app_for(&server),
            post_json("/api/v1/meal-planning/generate", &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
