use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use kiosk_core::types::{AvailableSpace, BinKind, BinPosition, BroadcastEvent};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn public_router(state: AppState) -> Router {
    Router::new()
        .route("/api/available-spaces", get(get_all_spaces))
        .route("/api/available-spaces/type/{kind}", get(get_spaces_by_kind))
        .route("/api/available-spaces/{id}", get(get_space_by_id))
        .with_state(state)
}

pub fn protected_router(state: AppState) -> Router {
    Router::new()
        .route("/api/available-spaces", post(create_space))
        .route("/api/available-spaces/{id}", put(update_space))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreateSpaceRequest {
    aisle: i32,
    section: i32,
    position: String,
    #[serde(rename = "type")]
    kind: String,
    percent: i32,
}

#[derive(Debug, Deserialize)]
struct UpdateSpaceRequest {
    percent: Option<i32>,
}

fn check_percent(percent: i32) -> ApiResult<()> {
    if !(0..=100).contains(&percent) {
        return Err(ApiError::BadRequest(
            "Percent must be a number between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

async fn get_all_spaces(State(state): State<AppState>) -> ApiResult<Json<Vec<AvailableSpace>>> {
    let spaces = kiosk_db::queries::available_spaces::list_all(&state.db).await?;
    Ok(Json(spaces))
}

async fn get_space_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AvailableSpace>> {
    let space = kiosk_db::queries::available_spaces::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Available space record not found".to_string()))?;
    Ok(Json(space))
}

async fn get_spaces_by_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<AvailableSpace>>> {
    let kind = BinKind::parse(&kind)?;
    let spaces = kiosk_db::queries::available_spaces::list_by_kind(&state.db, kind).await?;
    Ok(Json(spaces))
}

async fn create_space(
    State(state): State<AppState>,
    Json(payload): Json<CreateSpaceRequest>,
) -> ApiResult<(StatusCode, Json<AvailableSpace>)> {
    check_percent(payload.percent)?;
    let position = BinPosition::parse(&payload.position)?;
    let kind = BinKind::parse(&payload.kind)?;

    let space = kiosk_db::queries::available_spaces::create(
        &state.db,
        payload.aisle,
        payload.section,
        position,
        kind,
        payload.percent,
    )
    .await?;

    state
        .registry
        .broadcast(&BroadcastEvent::AvailableSpaceUpdate {
            data: space.clone(),
        })
        .await;

    Ok((StatusCode::CREATED, Json(space)))
}

async fn update_space(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSpaceRequest>,
) -> ApiResult<Json<AvailableSpace>> {
    let percent = payload
        .percent
        .ok_or_else(|| ApiError::BadRequest("Percent value is required".to_string()))?;
    check_percent(percent)?;

    let space = kiosk_db::queries::available_spaces::update_percent(&state.db, id, percent)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bin not found".to_string()))?;

    state
        .registry
        .broadcast(&BroadcastEvent::AvailableSpaceUpdate {
            data: space.clone(),
        })
        .await;

    Ok(Json(space))
}
