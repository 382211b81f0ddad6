use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{CoreError, WeatherError};

/// Adapter from the core error taxonomy to HTTP responses. Every failure
/// kind keeps its own `(status, kind)` pair so callers can tell "room
/// missing" from "no reading yet" from "provider down".
#[derive(Debug)]
pub struct AppError(pub CoreError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::RoomNotFound(_) | CoreError::NoReadingAvailable(_) => {
                StatusCode::NOT_FOUND
            }
            CoreError::WeatherUnavailable(WeatherError::Timeout(_)) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            CoreError::WeatherUnavailable(_) => StatusCode::BAD_GATEWAY,
            CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(kind = self.0.kind(), error = %self.0, "Request failed");
        }

        let body = Json(json!({
            "kind": self.0.kind(),
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        Self(e)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self(CoreError::Database(e))
    }
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        Self(CoreError::WeatherUnavailable(e))
    }
}
