use crate::state::AppState;
use aimeals::shopping::{generate_shopping_list, ShoppingList};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
struct ShoppingListResponse {
    data: ShoppingList,
}

/// Accepts `{"days": {...}}` or the bare day map
fn week_from_payload(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("days") => {
            map.remove("days").unwrap_or(Value::Null)
        }
        other => other,
    }
}

async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ShoppingListResponse>, (StatusCode, Json<Value>)> {
    let week = week_from_payload(payload);
    if !week.is_object() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "expected an object of days"})),
        ));
    }

    match generate_shopping_list(state.provider_config(), &week).await {
        Ok(data) => Ok(Json(ShoppingListResponse { data })),
        Err(e) => {
            tracing::error!(error = %e, "shopping list generation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": format!("{:#}", e)})),
            ))
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .with_state(state)
}
