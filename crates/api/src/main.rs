use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;

use kiosk_core::broadcast::ConnectionRegistry;
use kiosk_core::config::Settings;
use kiosk_slack::bridge::SlackBridge;
use kiosk_slack::client::SlackClient;
use kiosk_slack::reminder::ReminderScheduler;

mod error;
mod middleware;
mod routes;
mod state;
mod ws;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Arc::new(Settings::from_env()?);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    if settings.is_production() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&settings.database_url)
        .await?;

    let registry = Arc::new(ConnectionRegistry::new());
    let slack_client = SlackClient::new(&settings.slack_bot_token)?;
    let bridge = Arc::new(SlackBridge::new(
        db.clone(),
        registry.clone(),
        slack_client.clone(),
    ));

    // One schedule per configured channel; lives for the whole process
    // and is torn down when it drops at shutdown.
    let scheduler = ReminderScheduler::new(
        slack_client,
        Duration::from_secs(settings.reminder_interval_secs),
    );
    if let Some(channel) = settings.slack_reminder_channel.as_deref() {
        scheduler.start(channel).await;
    }

    let state = AppState {
        db,
        registry,
        bridge,
        settings: settings.clone(),
    };

    let app = Router::new()
        .merge(routes::health_router(state.clone()))
        .merge(routes::api_router(state.clone()))
        .merge(ws::router(state));

    let addr: SocketAddr = settings.api_bind.parse()?;

    info!(%addr, env = %settings.kiosk_env, "starting kiosk api");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
