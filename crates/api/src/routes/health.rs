use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value as JsonValue};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<JsonValue> {
    let db_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "connections": state.registry.connection_count().await,
    }))
}
