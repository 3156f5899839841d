pub mod auth;
pub mod available_spaces;
pub mod health;
pub mod safety_messages;
pub mod slack;
pub mod stations;

use axum::{middleware::from_fn_with_state, Router};

use crate::middleware::auth::jwt_auth;
use crate::state::AppState;

pub fn api_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(stations::protected_router(state.clone()))
        .merge(safety_messages::protected_router(state.clone()))
        .merge(available_spaces::protected_router(state.clone()))
        .layer(from_fn_with_state(state.clone(), jwt_auth));

    Router::new()
        .merge(stations::public_router(state.clone()))
        .merge(safety_messages::public_router(state.clone()))
        .merge(available_spaces::public_router(state.clone()))
        .merge(auth::router(state.clone()))
        .merge(slack::router(state))
        .merge(protected)
}

pub fn health_router(state: AppState) -> Router {
    health::router(state)
}
