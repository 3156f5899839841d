use chrono::{DateTime, Utc};
use sqlx::FromRow;

use kiosk_core::protocol::{normalize_status, ProtocolError};
use kiosk_core::types::{
    AvailableSpace, BinKind, BinPosition, EndIndicator, MessagePriority, SafetyMessage, Side,
    Station,
};

/// Raw `stations` row. The `status` column is TEXT and may still hold the
/// legacy composite forms `AQ+PS` / `PS+AQ`; normalization into the
/// canonical [`Station`] shape happens here, at the store boundary.
#[derive(Debug, Clone, FromRow)]
pub struct StationRow {
    pub id: i64,
    pub side: String,
    pub floor: i32,
    pub level: i32,
    pub station_number: i32,
    pub status: String,
    pub end_indicator: String,
    pub updated_at: DateTime<Utc>,
}

impl StationRow {
    pub fn into_station(self) -> Result<Station, sqlx::Error> {
        let side = Side::parse(&self.side).map_err(decode_error)?;
        let (status, secondary_status) = normalize_status(&self.status).map_err(decode_error)?;
        let end_indicator = EndIndicator::parse(&self.end_indicator).map_err(decode_error)?;
        Ok(Station {
            id: self.id,
            side,
            floor: self.floor,
            level: self.level,
            station_number: self.station_number,
            status,
            secondary_status,
            end_indicator,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SafetyMessageRow {
    pub id: i64,
    pub text: String,
    pub priority: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl SafetyMessageRow {
    pub fn into_message(self) -> Result<SafetyMessage, sqlx::Error> {
        let priority = MessagePriority::parse(&self.priority).map_err(decode_error)?;
        Ok(SafetyMessage {
            id: self.id,
            text: self.text,
            priority,
            is_active: self.is_active,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AvailableSpaceRow {
    pub id: i64,
    pub aisle: i32,
    pub section: i32,
    pub position: String,
    pub kind: String,
    pub percent: i32,
    pub updated_at: DateTime<Utc>,
}

impl AvailableSpaceRow {
    pub fn into_space(self) -> Result<AvailableSpace, sqlx::Error> {
        let position = BinPosition::parse(&self.position).map_err(decode_error)?;
        let kind = BinKind::parse(&self.kind).map_err(decode_error)?;
        Ok(AvailableSpace {
            id: self.id,
            aisle: self.aisle,
            section: self.section,
            position,
            kind,
            percent: self.percent,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

fn decode_error(err: ProtocolError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
