use crate::state::AppState;
use aimeals::usda::client::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: String,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page_number")]
    page_number: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page_number() -> u32 {
    DEFAULT_PAGE_NUMBER
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchQuery>) -> Json<Value> {
    Json(
        state
            .usda
            .search(&params.query, params.page_size, params.page_number)
            .await,
    )
}

async fn food(State(state): State<AppState>, Path(fdc_id): Path<i64>) -> Json<Value> {
    Json(state.usda.get_detail(fdc_id).await)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/food/:fdc_id", get(food))
        .with_state(state)
}
