//! Block Kit rendering for the interactive station panel.
//!
//! Pure functions of current station state; nothing here caches or talks
//! to the network.

use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use kiosk_core::types::{EndIndicator, Side, Station, StationStatus};

pub fn status_emoji(status: StationStatus) -> &'static str {
    match status {
        StationStatus::ActiveQueue => "🔵",
        StationStatus::ProblemSolver => "🟠",
        StationStatus::Inactive => "⚫",
    }
}

/// Short label shown on the status button (Inactive renders as IA).
pub fn status_display(status: StationStatus) -> &'static str {
    match status {
        StationStatus::ActiveQueue => "AQ",
        StationStatus::ProblemSolver => "PS",
        StationStatus::Inactive => "IA",
    }
}

pub fn indicator_emoji(indicator: EndIndicator) -> &'static str {
    match indicator {
        EndIndicator::Hi => "⬆️",
        EndIndicator::Lo => "⬇️",
    }
}

/// One interactive row per station: a label, a status-cycle button and an
/// indicator-toggle button. Button values carry the station id and the
/// state the button was rendered against.
pub fn station_row(station: &Station) -> JsonValue {
    json!({
        "type": "actions",
        "elements": [
            {
                "type": "button",
                "text": {
                    "type": "plain_text",
                    "text": format!(
                        "{}-{}-{}",
                        station.level,
                        station.side.as_str(),
                        station.station_number
                    )
                }
            },
            {
                "type": "button",
                "text": {
                    "type": "plain_text",
                    "text": format!(
                        "{} {}",
                        status_emoji(station.status),
                        status_display(station.status)
                    )
                },
                "value": json!({
                    "station_id": station.id,
                    "current_status": station.status,
                }).to_string(),
                "action_id": "cycle_status"
            },
            {
                "type": "button",
                "text": {
                    "type": "plain_text",
                    "text": format!(
                        "{} {}",
                        indicator_emoji(station.end_indicator),
                        station.end_indicator.as_str()
                    )
                },
                "value": json!({
                    "station_id": station.id,
                    "current_end": station.end_indicator,
                }).to_string(),
                "action_id": "toggle_end_indicator"
            }
        ]
    })
}

/// Builds the full interactive panel for one side: header, then for each
/// level (ascending) a section block followed by that level's station rows
/// sorted by station number.
pub fn render_station_panel(side: Side, stations: &[Station]) -> JsonValue {
    let mut blocks = vec![json!({
        "type": "header",
        "text": {
            "type": "plain_text",
            "text": format!("Station Management – Side {}", side.as_str())
        }
    })];

    let mut by_level: BTreeMap<i32, Vec<&Station>> = BTreeMap::new();
    for station in stations {
        by_level.entry(station.level).or_default().push(station);
    }

    for (level, mut level_stations) in by_level {
        blocks.push(json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("*Level {}*", level)
            }
        }));

        level_stations.sort_by_key(|station| station.station_number);
        for station in level_stations {
            blocks.push(station_row(station));
        }
    }

    json!({ "blocks": blocks })
}

/// The fixed two-button reminder prompt posted by the scheduler.
pub fn reminder_message(channel: &str) -> JsonValue {
    json!({
        "channel": channel,
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": "*Hourly Station Update Reminder*\n⏰ Time to update your station statuses!"
                }
            },
            {
                "type": "actions",
                "elements": [
                    {
                        "type": "button",
                        "text": { "type": "plain_text", "text": "Update Side A" },
                        "value": "A",
                        "action_id": "update_side_a"
                    },
                    {
                        "type": "button",
                        "text": { "type": "plain_text", "text": "Update Side B" },
                        "value": "B",
                        "action_id": "update_side_b"
                    }
                ]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn station(id: i64, level: i32, number: i32) -> Station {
        Station {
            id,
            side: Side::A,
            floor: 1,
            level,
            station_number: number,
            status: StationStatus::ActiveQueue,
            secondary_status: None,
            end_indicator: EndIndicator::Hi,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_panel_block_ordering() {
        // Deliberately out of order: rendering must sort levels ascending
        // and stations by number within each level.
        let stations = vec![
            station(1, 1, 102),
            station(2, 1, 101),
            station(3, 2, 150),
        ];

        let panel = render_station_panel(Side::A, &stations);
        let blocks = panel["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 6);

        assert_eq!(blocks[0]["type"], "header");
        assert_eq!(blocks[1]["type"], "section");
        assert_eq!(blocks[1]["text"]["text"], "*Level 1*");
        assert_eq!(blocks[2]["type"], "actions");
        assert_eq!(blocks[2]["elements"][0]["text"]["text"], "1-A-101");
        assert_eq!(blocks[3]["elements"][0]["text"]["text"], "1-A-102");
        assert_eq!(blocks[4]["text"]["text"], "*Level 2*");
        assert_eq!(blocks[5]["elements"][0]["text"]["text"], "2-A-150");
    }

    #[test]
    fn test_station_row_button_values_encode_current_state() {
        let row = station_row(&station(42, 1, 101));
        let status_value: serde_json::Value =
            serde_json::from_str(row["elements"][1]["value"].as_str().unwrap()).unwrap();
        assert_eq!(status_value["station_id"], 42);
        assert_eq!(status_value["current_status"], "AQ");

        let end_value: serde_json::Value =
            serde_json::from_str(row["elements"][2]["value"].as_str().unwrap()).unwrap();
        assert_eq!(end_value["station_id"], 42);
        assert_eq!(end_value["current_end"], "Hi");

        assert_eq!(row["elements"][1]["action_id"], "cycle_status");
        assert_eq!(row["elements"][2]["action_id"], "toggle_end_indicator");
    }

    #[test]
    fn test_status_display_inactive_shortens_to_ia() {
        assert_eq!(status_display(StationStatus::Inactive), "IA");
        assert_eq!(status_emoji(StationStatus::ProblemSolver), "🟠");
    }

    #[test]
    fn test_reminder_message_buttons() {
        let message = reminder_message("#stow-kiosk");
        assert_eq!(message["channel"], "#stow-kiosk");
        let elements = message["blocks"][1]["elements"].as_array().unwrap();
        assert_eq!(elements[0]["action_id"], "update_side_a");
        assert_eq!(elements[1]["action_id"], "update_side_b");
    }
}
