use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use kiosk_core::signing::verify_request;
use kiosk_slack::bridge::InteractionPayload;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/slack/command", post(handle_command))
        .route("/api/slack/interactive", post(handle_interactive))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SlashCommandForm {
    #[serde(default)]
    command: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct InteractiveForm {
    payload: String,
}

/// Signature verification runs against the raw, unparsed body; the body
/// is only decoded once the request is proven to come from Slack.
fn verify_slack_request(state: &AppState, headers: &HeaderMap, body: &[u8]) -> ApiResult<()> {
    let signature = headers
        .get("x-slack-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;
    let timestamp = headers
        .get("x-slack-request-timestamp")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;
    let body = std::str::from_utf8(body)
        .map_err(|_| ApiError::Unauthorized("Unauthorized".to_string()))?;

    let verified = verify_request(
        &state.settings.slack_signing_secret,
        timestamp,
        body,
        signature,
        Utc::now().timestamp(),
    );
    if !verified {
        warn!("slack signature verification failed");
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    }
    Ok(())
}

async fn handle_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<JsonValue>> {
    verify_slack_request(&state, &headers, &body)?;

    let form: SlashCommandForm = serde_urlencoded::from_bytes(&body)
        .map_err(|_| ApiError::BadRequest("Invalid form data".to_string()))?;

    let response = state
        .bridge
        .handle_slash_command(&form.command, &form.text)
        .await;
    Ok(Json(response))
}

async fn handle_interactive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<JsonValue>> {
    verify_slack_request(&state, &headers, &body)?;

    let form: InteractiveForm = serde_urlencoded::from_bytes(&body)
        .map_err(|_| ApiError::BadRequest("Invalid form data".to_string()))?;
    let payload: InteractionPayload = serde_json::from_str(&form.payload)
        .map_err(|_| ApiError::BadRequest("Invalid payload format".to_string()))?;

    if payload.kind != "block_actions" {
        return Ok(Json(serde_json::json!({ "text": "Unknown action" })));
    }

    let response = state.bridge.handle_interaction(&payload).await;
    Ok(Json(response))
}
