use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::models::{Room, TemperatureReading},
    error::CoreError,
    readings::ReadingStore,
    rooms::RoomRegistry,
    weather::{models::WeatherSnapshot, WeatherClient},
};

/// A heating recommendation for one room, computed on demand from the
/// latest reading, the configured target and current outdoor weather.
/// Derived — never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HeatingDecision {
    pub room_id: Uuid,
    pub heater_on: bool,
    /// Degrees Celsius
    pub indoor_temperature: f64,
    /// Degrees Celsius
    pub target_temperature: f64,
    /// Degrees Celsius
    pub outdoor_temperature: f64,
    pub outdoor_condition: String,
    pub reason: String,
}

/// Combines the Room Registry, Reading Store and Weather Gateway into a
/// heating recommendation. Stateless: every call re-reads its three inputs
/// and identical inputs produce identical output.
#[derive(Debug, Clone)]
pub struct DecisionService {
    rooms: RoomRegistry,
    readings: ReadingStore,
    weather: WeatherClient,
}

impl DecisionService {
    pub fn new(rooms: RoomRegistry, readings: ReadingStore, weather: WeatherClient) -> Self {
        Self { rooms, readings, weather }
    }

    /// Produces the heating decision for `room_id`.
    ///
    /// Room and latest reading are fetched concurrently; the first failure
    /// aborts the decision (`RoomNotFound` / `NoReadingAvailable`). Weather
    /// is then fetched for the room's coordinate and a gateway failure
    /// surfaces as `WeatherUnavailable` with the upstream kind preserved —
    /// a dependency outage is never masked as a real recommendation.
    pub async fn evaluate(&self, room_id: Uuid) -> Result<HeatingDecision, CoreError> {
        // Independent reads, issued concurrently. An unregistered room also
        // has no readings, so the room error is checked first to keep the
        // reported kind deterministic.
        let (room, reading) =
            tokio::join!(self.rooms.get(room_id), self.readings.latest(room_id));
        let (room, reading) = (room?, reading?);

        let weather = self
            .weather
            .current(room.latitude, room.longitude)
            .await?;

        let decision = decide(&room, &reading, &weather);
        info!(
            room_id = %room_id,
            heater_on = decision.heater_on,
            indoor = decision.indoor_temperature,
            target = decision.target_temperature,
            outdoor = decision.outdoor_temperature,
            "Heating decision computed"
        );
        Ok(decision)
    }
}

/// The heating rule: heat exactly when the measured indoor temperature is
/// strictly below the target. Equality means the target is met, so the
/// heater stays off. Weather is contextual only — it appears in the
/// decision and its reason but never overrides the indoor-vs-target
/// comparison.
pub fn decide(room: &Room, reading: &TemperatureReading, weather: &WeatherSnapshot) -> HeatingDecision {
    let heater_on = reading.value < room.target_temperature;
    HeatingDecision {
        room_id: room.id,
        heater_on,
        indoor_temperature: reading.value,
        target_temperature: room.target_temperature,
        outdoor_temperature: weather.outdoor_temperature,
        outdoor_condition: weather.condition.clone(),
        reason: describe(heater_on, reading.value, room.target_temperature, weather),
    }
}

fn describe(heater_on: bool, indoor: f64, target: f64, weather: &WeatherSnapshot) -> String {
    let comparison = if heater_on {
        format!("indoor {indoor:.1}°C is below target {target:.1}°C")
    } else {
        format!("indoor {indoor:.1}°C is at or above target {target:.1}°C")
    };
    let outdoor = format!(
        "outdoor {:.1}°C ({})",
        weather.outdoor_temperature, weather.condition
    );
    if heater_on && weather.outdoor_temperature >= target {
        format!("{comparison}; {outdoor} — heating despite mild outdoor conditions")
    } else {
        format!("{comparison}; {outdoor}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn room(target: f64) -> Room {
        Room {
            id: Uuid::new_v4(),
            name: "living room".to_owned(),
            latitude: 52.52,
            longitude: 13.4,
            target_temperature: target,
        }
    }

    fn reading(room_id: Uuid, value: f64) -> TemperatureReading {
        TemperatureReading {
            id: 1,
            room_id,
            value,
            recorded_at: Utc::now(),
        }
    }

    fn weather(outdoor: f64, code: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            latitude: 52.52,
            longitude: 13.4,
            outdoor_temperature: outdoor,
            condition_code: code,
            condition: crate::weather::models::condition_description(code).to_owned(),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn below_target_turns_heater_on() {
        let room = room(21.0);
        let d = decide(&room, &reading(room.id, 19.5), &weather(4.2, 3));
        assert!(d.heater_on);
        assert_eq!(d.indoor_temperature, 19.5);
        assert_eq!(d.target_temperature, 21.0);
        assert_eq!(d.outdoor_temperature, 4.2);
    }

    #[test]
    fn at_target_keeps_heater_off() {
        let room = room(21.0);
        let d = decide(&room, &reading(room.id, 21.0), &weather(4.2, 3));
        assert!(!d.heater_on);
    }

    #[test]
    fn above_target_keeps_heater_off() {
        let room = room(21.0);
        let d = decide(&room, &reading(room.id, 22.3), &weather(4.2, 3));
        assert!(!d.heater_on);
    }

    #[test]
    fn weather_never_overrides_the_indoor_rule() {
        let room = room(21.0);
        // Mild outdoors, cold indoors: still heat.
        assert!(decide(&room, &reading(room.id, 15.0), &weather(25.0, 0)).heater_on);
        // Freezing outdoors, warm indoors: still off.
        assert!(!decide(&room, &reading(room.id, 22.0), &weather(-10.0, 75)).heater_on);
    }

    #[test]
    fn identical_inputs_produce_identical_decisions() {
        let room = room(21.0);
        let r = reading(room.id, 19.5);
        let w = weather(4.2, 3);
        assert_eq!(decide(&room, &r, &w), decide(&room, &r, &w));
    }

    #[test]
    fn reason_mentions_both_comparisons() {
        let room = room(21.0);
        let d = decide(&room, &reading(room.id, 19.5), &weather(4.2, 3));
        assert!(d.reason.contains("indoor 19.5°C is below target 21.0°C"));
        assert!(d.reason.contains("outdoor 4.2°C (Overcast)"));
    }

    #[test]
    fn reason_flags_heating_while_outdoors_is_mild() {
        let room = room(21.0);
        let d = decide(&room, &reading(room.id, 18.0), &weather(24.0, 0));
        assert!(d.heater_on);
        assert!(d.reason.contains("mild outdoor conditions"));

        let cold = decide(&room, &reading(room.id, 18.0), &weather(2.0, 71));
        assert!(!cold.reason.contains("mild outdoor conditions"));
    }
}
