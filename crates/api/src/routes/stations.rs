use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use kiosk_core::broadcast::apply_station_update;
use kiosk_core::protocol::StationPatch;
use kiosk_core::types::{Side, Station};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn public_router(state: AppState) -> Router {
    Router::new()
        .route("/api/stations/side/{side}", get(get_stations_by_side))
        .with_state(state)
}

pub fn protected_router(state: AppState) -> Router {
    Router::new()
        .route("/api/stations", get(get_all_stations))
        .route("/api/stations/{id}", put(update_station))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct UpdateStationRequest {
    status: Option<String>,
    #[serde(rename = "endIndicator")]
    end_indicator: Option<String>,
}

async fn get_stations_by_side(
    State(state): State<AppState>,
    Path(side): Path<String>,
) -> ApiResult<Json<Vec<Station>>> {
    let side = Side::parse(&side)?;
    let stations = kiosk_db::queries::stations::list_by_side(&state.db, side).await?;
    Ok(Json(stations))
}

async fn get_all_stations(State(state): State<AppState>) -> ApiResult<Json<Vec<Station>>> {
    let stations = kiosk_db::queries::stations::list_all(&state.db).await?;
    Ok(Json(stations))
}

/// Field-level partial update. Validation happens in the protocol layer;
/// a successful write emits exactly one stationUpdate broadcast carrying
/// the full post-mutation record.
async fn update_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStationRequest>,
) -> ApiResult<Json<Station>> {
    let patch = StationPatch::from_raw(
        payload.status.as_deref(),
        payload.end_indicator.as_deref(),
    )?;

    let station = apply_station_update(
        &state.registry,
        kiosk_db::queries::stations::apply(&state.db, id, &patch),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Station not found".to_string()))?;

    Ok(Json(station))
}
