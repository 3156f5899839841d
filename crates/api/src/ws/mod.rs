use axum::{routing::get, Router};

use crate::state::AppState;

pub mod server;

pub fn router(state: AppState) -> Router {
    // Kiosk displays connect at the server root.
    Router::new()
        .route("/", get(server::kiosk_ws))
        .with_state(state)
}
