use std::sync::Arc;

use sqlx::PgPool;

use kiosk_core::broadcast::ConnectionRegistry;
use kiosk_core::config::Settings;
use kiosk_slack::bridge::SlackBridge;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub registry: Arc<ConnectionRegistry>,
    pub bridge: Arc<SlackBridge>,
    pub settings: Arc<Settings>,
}
