use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use kiosk_core::types::{BroadcastEvent, MessagePriority, SafetyMessage};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn public_router(state: AppState) -> Router {
    Router::new()
        .route("/api/safety-messages", get(get_active_messages))
        .with_state(state)
}

pub fn protected_router(state: AppState) -> Router {
    Router::new()
        .route("/api/safety-messages", post(create_message))
        .route(
            "/api/safety-messages/{id}",
            put(update_message).delete(delete_message),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreateMessageRequest {
    text: String,
    priority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateMessageRequest {
    text: Option<String>,
    priority: Option<String>,
    #[serde(rename = "isActive")]
    is_active: Option<bool>,
}

async fn get_active_messages(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SafetyMessage>>> {
    let messages = kiosk_db::queries::safety_messages::list_active(&state.db).await?;
    Ok(Json(messages))
}

async fn create_message(
    State(state): State<AppState>,
    Json(payload): Json<CreateMessageRequest>,
) -> ApiResult<(StatusCode, Json<SafetyMessage>)> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Message text is required".to_string()));
    }
    let priority = match payload.priority.as_deref() {
        Some(raw) => MessagePriority::parse(raw)?,
        None => MessagePriority::Normal,
    };

    let message = kiosk_db::queries::safety_messages::create(&state.db, text, priority).await?;

    state
        .registry
        .broadcast(&BroadcastEvent::SafetyMessageUpdate {
            data: message.clone(),
        })
        .await;

    Ok((StatusCode::CREATED, Json(message)))
}

async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMessageRequest>,
) -> ApiResult<Json<SafetyMessage>> {
    if let Some(text) = payload.text.as_deref() {
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest("Message text is required".to_string()));
        }
    }
    let priority = payload
        .priority
        .as_deref()
        .map(MessagePriority::parse)
        .transpose()?;

    let message = kiosk_db::queries::safety_messages::update(
        &state.db,
        id,
        payload.text.as_deref().map(str::trim),
        priority,
        payload.is_active,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Safety message not found".to_string()))?;

    state
        .registry
        .broadcast(&BroadcastEvent::SafetyMessageUpdate {
            data: message.clone(),
        })
        .await;

    Ok(Json(message))
}

async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<JsonValue>> {
    let deleted = kiosk_db::queries::safety_messages::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Safety message not found".to_string()));
    }
    Ok(Json(json!({ "id": id })))
}
