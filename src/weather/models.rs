use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::WeatherError;

// ---------------------------------------------------------------------------
// Open-Meteo response payload
//
// GET /v1/forecast?latitude=..&longitude=..
//       &current=temperature_2m,weather_code&timeformat=unixtime
//
//   {
//     "latitude": 52.52, "longitude": 13.41,
//     "current": {
//       "time": 1787568600,
//       "temperature_2m": 14.3,
//       "weather_code": 3
//     },
//     ...
//   }
//
// `timeformat=unixtime` is requested so `current.time` arrives as epoch
// seconds; the default ISO form is minute-precision without seconds, which
// is not a parseable timestamp.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
pub struct CurrentConditions {
    /// Unix timestamp (seconds)
    pub time: i64,
    pub temperature_2m: f64,
    pub weather_code: i32,
}

/// Current outdoor conditions at a coordinate. Ephemeral — fetched per
/// request and never persisted; two calls are not guaranteed to agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius
    pub outdoor_temperature: f64,
    /// WMO weather interpretation code
    pub condition_code: i32,
    pub condition: String,
    pub observed_at: DateTime<Utc>,
}

impl TryFrom<ForecastResponse> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(r: ForecastResponse) -> Result<Self, WeatherError> {
        // A timestamp chrono cannot represent is provider garbage, the same
        // as a payload that fails to deserialize.
        let observed_at = DateTime::from_timestamp(r.current.time, 0).ok_or_else(|| {
            WeatherError::InvalidResponse(format!(
                "current.time {} is not a representable unix timestamp",
                r.current.time
            ))
        })?;

        Ok(Self {
            latitude: r.latitude,
            longitude: r.longitude,
            outdoor_temperature: r.current.temperature_2m,
            condition_code: r.current.weather_code,
            condition: condition_description(r.current.weather_code).to_owned(),
            observed_at,
        })
    }
}

/// Human-readable description for a WMO weather interpretation code.
pub fn condition_description(code: i32) -> &'static str {
    match code {
        0 => "Clear Sky",
        1 => "Mainly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 => "Light Drizzle",
        53 => "Moderate Drizzle",
        55 => "Dense Drizzle",
        61 => "Slight Rain",
        63 => "Moderate Rain",
        65 => "Heavy Rain",
        71 => "Slight Snow",
        73 => "Moderate Snow",
        75 => "Heavy Snow",
        77 => "Snow Grains",
        80 => "Slight Showers",
        81 => "Moderate Showers",
        82 => "Violent Showers",
        85 => "Slight Snow Showers",
        86 => "Heavy Snow Showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with Hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_condition_codes() {
        assert_eq!(condition_description(0), "Clear Sky");
        assert_eq!(condition_description(3), "Overcast");
        assert_eq!(condition_description(45), "Foggy");
        assert_eq!(condition_description(48), "Foggy");
        assert_eq!(condition_description(99), "Thunderstorm with Hail");
    }

    #[test]
    fn unknown_condition_code_falls_back() {
        assert_eq!(condition_description(42), "Unknown");
        assert_eq!(condition_description(-1), "Unknown");
    }

    #[test]
    fn forecast_payload_deserializes_into_snapshot() {
        let json = r#"{
            "latitude": 52.52,
            "longitude": 13.41,
            "generationtime_ms": 0.05,
            "current": {
                "time": 1787568600,
                "temperature_2m": 14.3,
                "weather_code": 3
            }
        }"#;

        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        let snapshot = WeatherSnapshot::try_from(resp).unwrap();
        assert_eq!(snapshot.outdoor_temperature, 14.3);
        assert_eq!(snapshot.condition_code, 3);
        assert_eq!(snapshot.condition, "Overcast");
        assert_eq!(
            snapshot.observed_at,
            DateTime::from_timestamp(1787568600, 0).unwrap()
        );
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let json = r#"{"latitude": 52.52, "longitude": 13.41}"#;
        assert!(serde_json::from_str::<ForecastResponse>(json).is_err());
    }

    #[test]
    fn unrepresentable_timestamp_is_an_invalid_response() {
        let resp = ForecastResponse {
            latitude: 52.52,
            longitude: 13.41,
            current: CurrentConditions {
                time: i64::MAX,
                temperature_2m: 14.3,
                weather_code: 3,
            },
        };

        let err = WeatherSnapshot::try_from(resp).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }
}
