use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::ProtocolError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }

    /// Accepts the case-insensitive path form (`a` / `b`).
    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        match value.to_ascii_uppercase().as_str() {
            "A" => Ok(Side::A),
            "B" => Ok(Side::B),
            _ => Err(ProtocolError::InvalidSide(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StationStatus {
    #[serde(rename = "AQ")]
    ActiveQueue,
    #[serde(rename = "PS")]
    ProblemSolver,
    Inactive,
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatus::ActiveQueue => "AQ",
            StationStatus::ProblemSolver => "PS",
            StationStatus::Inactive => "Inactive",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        match value {
            "AQ" => Ok(StationStatus::ActiveQueue),
            "PS" => Ok(StationStatus::ProblemSolver),
            "Inactive" => Ok(StationStatus::Inactive),
            _ => Err(ProtocolError::InvalidStatus(value.to_string())),
        }
    }

    /// Single-click cycle used by the Slack and admin toggles.
    pub fn next(&self) -> Self {
        match self {
            StationStatus::ActiveQueue => StationStatus::ProblemSolver,
            StationStatus::ProblemSolver => StationStatus::Inactive,
            StationStatus::Inactive => StationStatus::ActiveQueue,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EndIndicator {
    Hi,
    Lo,
}

impl EndIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndIndicator::Hi => "Hi",
            EndIndicator::Lo => "Lo",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        match value {
            "Hi" => Ok(EndIndicator::Hi),
            "Lo" => Ok(EndIndicator::Lo),
            _ => Err(ProtocolError::InvalidIndicator(value.to_string())),
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            EndIndicator::Hi => EndIndicator::Lo,
            EndIndicator::Lo => EndIndicator::Hi,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessagePriority {
    Normal,
    Urgent,
}

impl MessagePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessagePriority::Normal => "normal",
            MessagePriority::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        match value {
            "normal" => Ok(MessagePriority::Normal),
            "urgent" => Ok(MessagePriority::Urgent),
            _ => Err(ProtocolError::InvalidPriority(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BinPosition {
    Top,
    Middle,
    Bottom,
}

impl BinPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinPosition::Top => "top",
            BinPosition::Middle => "middle",
            BinPosition::Bottom => "bottom",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        match value {
            "top" => Ok(BinPosition::Top),
            "middle" => Ok(BinPosition::Middle),
            "bottom" => Ok(BinPosition::Bottom),
            _ => Err(ProtocolError::InvalidBinField(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BinKind {
    Library,
    #[serde(rename = "Library Deep")]
    LibraryDeep,
}

impl BinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinKind::Library => "Library",
            BinKind::LibraryDeep => "Library Deep",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        match value {
            "Library" => Ok(BinKind::Library),
            "Library Deep" => Ok(BinKind::LibraryDeep),
            _ => Err(ProtocolError::InvalidBinField(value.to_string())),
        }
    }
}

/// Canonical station record as seen by every consumer (kiosk display,
/// Slack render, admin panel). Legacy composite statuses are normalized
/// at the store boundary, so `status` here is always one of the three
/// canonical values and `secondary_status` is only ever `PS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub side: Side,
    pub floor: i32,
    pub level: i32,
    pub station_number: i32,
    pub status: StationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_status: Option<StationStatus>,
    pub end_indicator: EndIndicator,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyMessage {
    pub id: i64,
    pub text: String,
    pub priority: MessagePriority,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSpace {
    pub id: i64,
    pub aisle: i32,
    pub section: i32,
    pub position: BinPosition,
    #[serde(rename = "type")]
    pub kind: BinKind,
    pub percent: i32,
    pub updated_at: DateTime<Utc>,
}

/// Transient event pushed to every connected kiosk display.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum BroadcastEvent {
    #[serde(rename = "info")]
    Info { message: String },
    #[serde(rename = "stationUpdate")]
    StationUpdate { data: Station },
    #[serde(rename = "availableSpaceUpdate")]
    AvailableSpaceUpdate { data: AvailableSpace },
    #[serde(rename = "safetyMessageUpdate")]
    SafetyMessageUpdate { data: SafetyMessage },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_to_wire_form() {
        assert_eq!(
            serde_json::to_string(&StationStatus::ActiveQueue).unwrap(),
            r#""AQ""#
        );
        assert_eq!(
            serde_json::to_string(&StationStatus::Inactive).unwrap(),
            r#""Inactive""#
        );
    }

    #[test]
    fn test_side_parse_case_insensitive() {
        assert_eq!(Side::parse("a").unwrap(), Side::A);
        assert_eq!(Side::parse("B").unwrap(), Side::B);
        assert!(Side::parse("c").is_err());
    }

    #[test]
    fn test_broadcast_event_tagging() {
        let event = BroadcastEvent::Info {
            message: "Connected to WebSocket".to_string(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(json["type"], "info");
        assert_eq!(json["message"], "Connected to WebSocket");
    }

    #[test]
    fn test_bin_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&BinKind::LibraryDeep).unwrap(),
            r#""Library Deep""#
        );
    }
}
