pub mod meal_planning;
pub mod recipe;
pub mod shopping;
pub mod status;
pub mod usda;

use crate::state::AppState;
use axum::Router;

pub const API_PREFIX: &str = "/api/v1";

pub fn configure(state: AppState) -> Router {
    let api = Router::new()
        .nest("/meal-planning", meal_planning::routes(state.clone()))
        .nest("/recipe", recipe::routes(state.clone()))
        .nest("/shopping", shopping::routes(state.clone()))
        .nest("/usda", usda::routes(state));

    Router::new()
        .nest(API_PREFIX, api)
        .merge(status::routes())
}
