use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Failure modes of the external weather provider. Grouped into
/// [`CoreError::WeatherUnavailable`] at the decision boundary, but the
/// individual kind is preserved for observability and status mapping.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather provider unavailable: {0}")]
    Unavailable(String),

    #[error("weather provider did not respond within {0:?}")]
    Timeout(Duration),

    #[error("weather provider returned an unparseable payload: {0}")]
    InvalidResponse(String),
}

/// Error taxonomy of the core. Every variant maps to a distinct outcome at
/// the API boundary — "room missing" and "no reading yet" are never
/// collapsed into one generic error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input: non-finite numbers, out-of-range coordinates or
    /// targets, empty identifiers. Recoverable by correcting the request.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("room {0} not found")]
    RoomNotFound(Uuid),

    /// The room exists but has no recorded temperature yet. A missing
    /// reading is an explicit outcome, never a default indoor temperature.
    #[error("no temperature readings recorded for room {0}")]
    NoReadingAvailable(Uuid),

    #[error("weather data unavailable: {0}")]
    WeatherUnavailable(#[from] WeatherError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable machine-readable identifier for this failure kind, used in
    /// API error bodies so callers can distinguish outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation_error",
            CoreError::RoomNotFound(_) => "room_not_found",
            CoreError::NoReadingAvailable(_) => "no_reading_available",
            CoreError::WeatherUnavailable(WeatherError::Unavailable(_)) => "upstream_unavailable",
            CoreError::WeatherUnavailable(WeatherError::Timeout(_)) => "upstream_timeout",
            CoreError::WeatherUnavailable(WeatherError::InvalidResponse(_)) => {
                "upstream_invalid_response"
            }
            CoreError::Database(_) => "internal_error",
        }
    }
}
