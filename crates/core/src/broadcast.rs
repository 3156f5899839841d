//! Fan-out registry for live kiosk WebSocket connections.
//!
//! Created once at server start and injected into connection and request
//! handlers; owns nothing but the ephemeral set of connected sockets.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::types::{BroadcastEvent, Station};

/// One live display connection. The sender feeds the connection's
/// outbound write task; dropping the receiving side marks the
/// connection dead.
#[derive(Debug)]
pub struct KioskConnection {
    pub connection_id: String,
    pub sender: mpsc::Sender<String>,
    pub connected_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<String, KioskConnection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, conn: KioskConnection) {
        let connection_id = conn.connection_id.clone();
        self.connections.write().await.insert(connection_id, conn);
    }

    pub async fn unregister(&self, connection_id: &str) {
        self.connections.write().await.remove(connection_id);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Serializes the event once and pushes the same payload to every
    /// registered connection. Fire-and-forget: a connection that is gone
    /// or not keeping up is skipped, never an error; it is reaped on its
    /// own close path.
    pub async fn broadcast(&self, event: &BroadcastEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize broadcast event");
                return;
            }
        };

        let connections = self.connections.read().await;
        debug!(clients = connections.len(), "broadcasting event");
        for conn in connections.values() {
            if conn.sender.try_send(payload.clone()).is_err() {
                debug!(connection_id = %conn.connection_id, "skipping non-open connection");
            }
        }
    }
}

/// Drives a station mutation through to the displays: awaits the store
/// write and, when it yields a station, emits exactly one `stationUpdate`
/// carrying the post-mutation record. A missing station or a failed write
/// emits nothing. Every mutation path (HTTP or Slack) goes through here.
pub async fn apply_station_update<E, F>(
    registry: &ConnectionRegistry,
    write: F,
) -> Result<Option<Station>, E>
where
    F: Future<Output = Result<Option<Station>, E>>,
{
    let station = write.await?;
    if let Some(station) = &station {
        registry
            .broadcast(&BroadcastEvent::StationUpdate {
                data: station.clone(),
            })
            .await;
    }
    Ok(station)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BroadcastEvent, EndIndicator, Side, StationStatus};
    use tokio::sync::mpsc::error::TryRecvError;

    fn connection(id: &str) -> (KioskConnection, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (
            KioskConnection {
                connection_id: id.to_string(),
                sender: tx,
                connected_at: Utc::now(),
            },
            rx,
        )
    }

    fn info(message: &str) -> BroadcastEvent {
        BroadcastEvent::Info {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_registered_connections() {
        let registry = ConnectionRegistry::new();
        let (conn_a, mut rx_a) = connection("conn_a");
        let (conn_b, mut rx_b) = connection("conn_b");
        registry.register(conn_a).await;
        registry.register(conn_b).await;

        registry.broadcast(&info("hello")).await;

        let payload_a = rx_a.recv().await.unwrap();
        let payload_b = rx_b.recv().await.unwrap();
        assert_eq!(payload_a, payload_b);
        assert!(payload_a.contains(r#""type":"info""#));
    }

    #[tokio::test]
    async fn test_broadcast_skips_disconnected_connection() {
        let registry = ConnectionRegistry::new();
        let (conn_a, mut rx_a) = connection("conn_a");
        let (conn_b, rx_b) = connection("conn_b");
        registry.register(conn_a).await;
        registry.register(conn_b).await;

        // Receiver gone but not yet unregistered: the lazily-reaped case.
        drop(rx_b);

        registry.broadcast(&info("still here")).await;

        assert!(rx_a.recv().await.is_some());
        assert_eq!(registry.connection_count().await, 2);
    }

    #[tokio::test]
    async fn test_unregister_removes_connection() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = connection("conn_x");
        registry.register(conn).await;
        assert_eq!(registry.connection_count().await, 1);

        registry.unregister("conn_x").await;
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_with_no_connections_is_noop() {
        let registry = ConnectionRegistry::new();
        registry.broadcast(&info("nobody home")).await;
    }

    fn station() -> Station {
        Station {
            id: 7,
            side: Side::A,
            floor: 1,
            level: 2,
            station_number: 115,
            status: StationStatus::ProblemSolver,
            secondary_status: None,
            end_indicator: EndIndicator::Hi,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_successful_write_emits_exactly_one_station_update() {
        let registry = ConnectionRegistry::new();
        let (conn, mut rx) = connection("conn_a");
        registry.register(conn).await;

        let result =
            apply_station_update(&registry, async { Ok::<_, &str>(Some(station())) }).await;
        assert!(result.unwrap().is_some());

        let payload = rx.recv().await.unwrap();
        let event: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(event["type"], "stationUpdate");
        assert_eq!(event["data"]["id"], 7);
        assert_eq!(event["data"]["status"], "PS");
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_missing_station_emits_nothing() {
        let registry = ConnectionRegistry::new();
        let (conn, mut rx) = connection("conn_a");
        registry.register(conn).await;

        let result = apply_station_update(&registry, async { Ok::<_, &str>(None) }).await;
        assert!(result.unwrap().is_none());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_failed_write_emits_nothing() {
        let registry = ConnectionRegistry::new();
        let (conn, mut rx) = connection("conn_a");
        registry.register(conn).await;

        let result =
            apply_station_update(&registry, async { Err::<Option<Station>, _>("write failed") })
                .await;
        assert!(result.is_err());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}
