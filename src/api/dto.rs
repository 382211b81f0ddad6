use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::{Room, TemperatureReading};

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius
    pub target_temperature: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTargetRequest {
    /// Degrees Celsius
    pub target_temperature: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomDto {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius
    pub target_temperature: f64,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            name: r.name,
            latitude: r.latitude,
            longitude: r.longitude,
            target_temperature: r.target_temperature,
        }
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestReadingRequest {
    pub room_id: Uuid,
    /// Degrees Celsius
    pub value: f64,
    /// Defaults to server receipt time when omitted.
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestReadingBatchRequest {
    pub room_id: Uuid,
    pub readings: Vec<BatchReadingEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchReadingEntry {
    /// Degrees Celsius
    pub value: f64,
    /// Defaults to server receipt time when omitted.
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemperatureReadingDto {
    pub id: i64,
    pub room_id: Uuid,
    /// Degrees Celsius
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<TemperatureReading> for TemperatureReadingDto {
    fn from(r: TemperatureReading) -> Self {
        Self {
            id: r.id,
            room_id: r.room_id,
            value: r.value,
            recorded_at: r.recorded_at,
        }
    }
}
