use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered room: identity, the coordinate used for weather lookups,
/// and the single active target temperature. `target_temperature` is
/// updated in place, last writer wins; no history is kept.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius
    pub target_temperature: f64,
}

/// One timestamped indoor-temperature sample. Immutable once written —
/// rows are only ever appended, never updated or merged. Within a room the
/// latest reading is the one with the greatest `recorded_at`, ties broken
/// by the greatest `id` (insertion order).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub id: i64,
    pub room_id: Uuid,
    /// Degrees Celsius
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}
