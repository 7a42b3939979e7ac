use crate::state::AppState;
use aimeals::recipe::{generate_recipe, RecipeResponse};
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RecipeRequest {
    meal_name: String,
}

async fn generate(
    State(state): State<AppState>,
    Json(request): Json<RecipeRequest>,
) -> Json<RecipeResponse> {
    tracing::info!(meal_name = %request.meal_name, "generating recipe");
    Json(generate_recipe(state.provider_config(), &request.meal_name).await)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/generate-recipe", post(generate))
        .with_state(state)
}
