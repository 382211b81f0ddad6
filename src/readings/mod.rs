use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{db::models::TemperatureReading, error::CoreError};

/// Maximum number of entries accepted by a single batch ingestion call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Append-only time-series store of indoor temperature samples per room.
///
/// Cheap to clone — wraps a `PgPool` handle. Durability is delegated to
/// Postgres: a reading is committed before `record` returns, and no
/// in-process lock is held across calls.
#[derive(Debug, Clone)]
pub struct ReadingStore {
    pool: PgPool,
}

impl ReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a reading. Never overwrites or merges: several readings for
    /// the same room at the same instant are all retained, distinguished by
    /// insertion order.
    pub async fn record(
        &self,
        room_id: Uuid,
        value: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<TemperatureReading, CoreError> {
        validate_value(value)?;

        let reading = sqlx::query_as::<_, TemperatureReading>(
            "INSERT INTO temperature_readings (room_id, value, recorded_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, room_id, value, recorded_at",
        )
        .bind(room_id)
        .bind(value)
        .bind(recorded_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(room_id = %room_id, value, "Temperature reading recorded");
        Ok(reading)
    }

    /// Appends up to [`MAX_BATCH_SIZE`] readings for one room. The whole
    /// batch is validated before anything is written.
    pub async fn record_batch(
        &self,
        room_id: Uuid,
        entries: &[(f64, DateTime<Utc>)],
    ) -> Result<Vec<TemperatureReading>, CoreError> {
        if entries.len() > MAX_BATCH_SIZE {
            return Err(CoreError::validation(format!(
                "at most {MAX_BATCH_SIZE} readings per batch, got {}",
                entries.len()
            )));
        }
        for (value, _) in entries {
            validate_value(*value)?;
        }

        let mut recorded = Vec::with_capacity(entries.len());
        for (value, recorded_at) in entries {
            recorded.push(self.record(room_id, *value, *recorded_at).await?);
        }
        Ok(recorded)
    }

    /// Returns the reading with the maximum `recorded_at` for the room; on
    /// ties the most recently inserted wins. Zero readings is an explicit
    /// `NoReadingAvailable` outcome, never a default value.
    pub async fn latest(&self, room_id: Uuid) -> Result<TemperatureReading, CoreError> {
        sqlx::query_as::<_, TemperatureReading>(
            "SELECT id, room_id, value, recorded_at \
             FROM temperature_readings \
             WHERE room_id = $1 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT 1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CoreError::NoReadingAvailable(room_id))
    }

    /// Full-history query, ascending by `recorded_at` (insertion order as
    /// tiebreak), optionally bounded by an inclusive time range.
    pub async fn history(
        &self,
        room_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<TemperatureReading>, CoreError> {
        let rows = sqlx::query_as::<_, TemperatureReading>(
            "SELECT id, room_id, value, recorded_at \
             FROM temperature_readings \
             WHERE room_id = $1 \
               AND ($2::timestamptz IS NULL OR recorded_at >= $2) \
               AND ($3::timestamptz IS NULL OR recorded_at <= $3) \
             ORDER BY recorded_at ASC, id ASC",
        )
        .bind(room_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn validate_value(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::validation(format!(
            "temperature value must be finite, got {value}"
        )));
    }
    Ok(())
}
