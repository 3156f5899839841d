//! Stateless translator between Slack payloads and station update
//! protocol calls.
//!
//! Interaction handling never errors outward: every downstream failure is
//! converted into a user-visible "please try again" text response so a
//! Slack interaction is never left hanging.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tracing::{error, info};

use kiosk_core::broadcast::{apply_station_update, ConnectionRegistry};
use kiosk_core::protocol::StationPatch;
use kiosk_core::types::{
    BroadcastEvent, EndIndicator, MessagePriority, Side, Station, StationStatus,
};

use crate::blocks;
use crate::client::SlackClient;

const SAFETY_MESSAGE_HELP: &str = "*Safety Message Commands:*\n\
• `/safety-message add Your message here` - Add a new safety message\n\
• `/safety-message list` - List all active safety messages";

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    #[serde(default)]
    pub response_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionAction {
    pub action_id: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CycleStatusValue {
    station_id: i64,
    current_status: StationStatus,
}

#[derive(Debug, Deserialize)]
struct ToggleEndValue {
    station_id: i64,
    current_end: EndIndicator,
}

#[derive(Debug, Deserialize)]
struct LegacyUpdateValue {
    station_id: i64,
    status: StationStatus,
    end_indicator: EndIndicator,
}

/// Bridges Slack payloads to the station store and broadcast registry.
/// Owns no state of its own; every render reads fresh store state.
pub struct SlackBridge {
    db: PgPool,
    registry: Arc<ConnectionRegistry>,
    client: SlackClient,
}

impl SlackBridge {
    pub fn new(db: PgPool, registry: Arc<ConnectionRegistry>, client: SlackClient) -> Self {
        Self {
            db,
            registry,
            client,
        }
    }

    pub fn client(&self) -> &SlackClient {
        &self.client
    }

    /// Builds the interactive panel for a side from current store state.
    pub async fn render_station_panel(&self, side: Side) -> anyhow::Result<JsonValue> {
        let stations = kiosk_db::queries::stations::list_by_side(&self.db, side).await?;
        Ok(blocks::render_station_panel(side, &stations))
    }

    /// Dispatches a block action to the matching handler. Always returns
    /// a response body; unknown actions get an explicit text reply.
    pub async fn handle_interaction(&self, payload: &InteractionPayload) -> JsonValue {
        let Some(action) = payload.actions.first() else {
            return json!({ "text": "Unknown action" });
        };

        match action.action_id.as_str() {
            "cycle_status" => self.handle_cycle_status(action, payload.response_url.as_deref()).await,
            "toggle_end_indicator" => {
                self.handle_toggle_end(action, payload.response_url.as_deref()).await
            }
            "station_update" => self.handle_legacy_update(action).await,
            "update_side_a" => self.panel_or_error(Side::A).await,
            "update_side_b" => self.panel_or_error(Side::B).await,
            other => {
                info!(action_id = %other, "unrecognized slack action");
                json!({ "text": "Unknown action" })
            }
        }
    }

    async fn handle_cycle_status(
        &self,
        action: &InteractionAction,
        response_url: Option<&str>,
    ) -> JsonValue {
        let result = async {
            let value: CycleStatusValue =
                serde_json::from_str(action.value.as_deref().unwrap_or_default())?;
            let next = value.current_status.next();
            let station = self
                .apply_and_broadcast(value.station_id, &StationPatch::status(next))
                .await?;
            self.push_refreshed_panel(station.side, response_url).await?;
            Ok::<_, anyhow::Error>(next)
        }
        .await;

        match result {
            Ok(next) => json!({ "text": format!("Station updated to {}", next.as_str()) }),
            Err(err) => {
                error!(error = %err, "slack status cycle failed");
                json!({ "text": "Error updating status. Please try again." })
            }
        }
    }

    async fn handle_toggle_end(
        &self,
        action: &InteractionAction,
        response_url: Option<&str>,
    ) -> JsonValue {
        let result = async {
            let value: ToggleEndValue =
                serde_json::from_str(action.value.as_deref().unwrap_or_default())?;
            let next = value.current_end.toggle();
            let station = self
                .apply_and_broadcast(value.station_id, &StationPatch::end_indicator(next))
                .await?;
            self.push_refreshed_panel(station.side, response_url).await?;
            Ok::<_, anyhow::Error>(next)
        }
        .await;

        match result {
            Ok(next) => json!({ "text": format!("End indicator updated to {}", next.as_str()) }),
            Err(err) => {
                error!(error = %err, "slack end indicator toggle failed");
                json!({ "text": "Error updating end indicator. Please try again." })
            }
        }
    }

    /// Legacy action: applies an explicit status/indicator pair with no
    /// re-render push.
    async fn handle_legacy_update(&self, action: &InteractionAction) -> JsonValue {
        let result = async {
            let value: LegacyUpdateValue =
                serde_json::from_str(action.value.as_deref().unwrap_or_default())?;
            let patch = StationPatch {
                status: Some(value.status),
                end_indicator: Some(value.end_indicator),
            };
            let station = self.apply_and_broadcast(value.station_id, &patch).await?;
            Ok::<_, anyhow::Error>(station)
        }
        .await;

        match result {
            Ok(station) => {
                let arrow = match station.end_indicator {
                    EndIndicator::Hi => "↑",
                    EndIndicator::Lo => "↓",
                };
                json!({
                    "text": format!(
                        "Station {}-{}-{} updated to {} {}",
                        station.side.as_str(),
                        station.level,
                        station.station_number,
                        station.status.as_str(),
                        arrow
                    )
                })
            }
            Err(err) => {
                error!(error = %err, "slack legacy station update failed");
                json!({ "text": "Error updating station. Please try again." })
            }
        }
    }

    async fn panel_or_error(&self, side: Side) -> JsonValue {
        match self.render_station_panel(side).await {
            Ok(panel) => panel,
            Err(err) => {
                error!(error = %err, side = side.as_str(), "panel render failed");
                json!({ "text": "Error creating station update message. Please try again." })
            }
        }
    }

    /// Applies a validated patch through the station store and emits the
    /// stationUpdate broadcast, the same funnel the HTTP path uses.
    async fn apply_and_broadcast(
        &self,
        station_id: i64,
        patch: &StationPatch,
    ) -> anyhow::Result<Station> {
        patch.validate()?;
        let station = apply_station_update(
            &self.registry,
            kiosk_db::queries::stations::apply(&self.db, station_id, patch),
        )
        .await?
        .ok_or_else(|| anyhow::anyhow!("station {} not found", station_id))?;

        Ok(station)
    }

    /// Replaces the originating Slack message with a freshly rendered
    /// panel. No response_url means nothing to refresh.
    async fn push_refreshed_panel(
        &self,
        side: Side,
        response_url: Option<&str>,
    ) -> anyhow::Result<()> {
        let Some(response_url) = response_url else {
            return Ok(());
        };
        let panel = self.render_station_panel(side).await?;
        let body = json!({
            "replace_original": true,
            "blocks": panel["blocks"],
        });
        self.client.post_response(response_url, &body).await
    }

    /// Slash command dispatch: `/station-update [a|b]` and
    /// `/safety-message add|list`.
    pub async fn handle_slash_command(&self, command: &str, text: &str) -> JsonValue {
        match command {
            "/station-update" => {
                let side = if text.trim().eq_ignore_ascii_case("b") {
                    Side::B
                } else {
                    Side::A
                };
                self.panel_or_error(side).await
            }
            "/safety-message" => self.handle_safety_message_command(text).await,
            _ => json!({ "text": "Unknown command" }),
        }
    }

    async fn handle_safety_message_command(&self, text: &str) -> JsonValue {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return json!({ "text": SAFETY_MESSAGE_HELP });
        }

        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let subcommand = parts.next().unwrap_or_default().to_lowercase();
        let content = parts.next().unwrap_or_default().trim();

        match subcommand.as_str() {
            "list" => match kiosk_db::queries::safety_messages::list_active(&self.db).await {
                Ok(messages) if messages.is_empty() => {
                    json!({ "text": "No active safety messages found." })
                }
                Ok(messages) => {
                    let listing = messages
                        .iter()
                        .map(|msg| {
                            let marker = match msg.priority {
                                MessagePriority::Urgent => "🔴 [URGENT] ",
                                MessagePriority::Normal => "🔵 ",
                            };
                            format!("{}: {}{}", msg.id, marker, msg.text)
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    json!({ "text": format!("*Active Safety Messages:*\n{}", listing) })
                }
                Err(err) => {
                    error!(error = %err, "safety message list failed");
                    json!({ "text": "Error fetching messages. Please try again." })
                }
            },
            "add" => {
                if content.is_empty() {
                    return json!({
                        "text": "Please provide a message to add.\n\
                                 Example: `/safety-message add Equipment issue in aisle 5`"
                    });
                }
                match kiosk_db::queries::safety_messages::create(
                    &self.db,
                    content,
                    MessagePriority::Normal,
                )
                .await
                {
                    Ok(message) => {
                        self.registry
                            .broadcast(&BroadcastEvent::SafetyMessageUpdate {
                                data: message.clone(),
                            })
                            .await;
                        json!({ "text": format!("✅ Safety message added: \"{}\"", message.text) })
                    }
                    Err(err) => {
                        error!(error = %err, "safety message add failed");
                        json!({ "text": "Error adding safety message. Please try again." })
                    }
                }
            }
            _ => json!({
                "text": format!("I didn't understand that command. Try:\n{}", SAFETY_MESSAGE_HELP)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_status_value_decodes_button_payload() {
        let value: CycleStatusValue =
            serde_json::from_str(r#"{"station_id":5,"current_status":"AQ"}"#).unwrap();
        assert_eq!(value.station_id, 5);
        assert_eq!(value.current_status, StationStatus::ActiveQueue);
        assert_eq!(value.current_status.next(), StationStatus::ProblemSolver);
    }

    #[test]
    fn test_toggle_end_value_decodes_button_payload() {
        let value: ToggleEndValue =
            serde_json::from_str(r#"{"station_id":9,"current_end":"Lo"}"#).unwrap();
        assert_eq!(value.current_end.toggle(), EndIndicator::Hi);
    }

    #[test]
    fn test_interaction_payload_decodes_block_actions() {
        let raw = r#"{
            "type": "block_actions",
            "response_url": "https://hooks.slack.com/actions/T0/123/abc",
            "actions": [{"action_id": "cycle_status", "value": "{\"station_id\":1,\"current_status\":\"PS\"}"}]
        }"#;
        let payload: InteractionPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.kind, "block_actions");
        assert_eq!(payload.actions[0].action_id, "cycle_status");
        assert!(payload.response_url.is_some());
    }

    #[test]
    fn test_legacy_value_rejects_unknown_status() {
        let result: Result<LegacyUpdateValue, _> =
            serde_json::from_str(r#"{"station_id":1,"status":"Busy","end_indicator":"Hi"}"#);
        assert!(result.is_err());
    }
}
