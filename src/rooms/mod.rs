use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{db::models::Room, error::CoreError};

/// Targets outside this band are rejected — the thermostat is meant for
/// habitable rooms, not freezers or saunas.
pub const MIN_TARGET_TEMPERATURE: f64 = -50.0;
pub const MAX_TARGET_TEMPERATURE: f64 = 50.0;

/// Durable store of room identity, target temperature and the coordinate
/// used for weather lookups. Cheap to clone — wraps a `PgPool` handle.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    pool: PgPool,
}

impl RoomRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Room>, CoreError> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT id, name, latitude, longitude, target_temperature \
             FROM rooms ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    pub async fn get(&self, room_id: Uuid) -> Result<Room, CoreError> {
        sqlx::query_as::<_, Room>(
            "SELECT id, name, latitude, longitude, target_temperature \
             FROM rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CoreError::RoomNotFound(room_id))
    }

    pub async fn create(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        initial_target: f64,
    ) -> Result<Room, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::validation("room name must not be empty"));
        }
        validate_coordinate(latitude, longitude)?;
        validate_target(initial_target)?;

        let room = sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (id, name, latitude, longitude, target_temperature) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, latitude, longitude, target_temperature",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .bind(initial_target)
        .fetch_one(&self.pool)
        .await?;

        info!(room_id = %room.id, name = %room.name, "Room created");
        Ok(room)
    }

    /// Updates the target temperature in place. A single UPDATE statement,
    /// so concurrent calls on the same room serialize on the row: the last
    /// writer wins and the stored value is always one that was explicitly
    /// submitted.
    pub async fn set_target(&self, room_id: Uuid, new_target: f64) -> Result<Room, CoreError> {
        validate_target(new_target)?;

        let room = sqlx::query_as::<_, Room>(
            "UPDATE rooms SET target_temperature = $2 \
             WHERE id = $1 \
             RETURNING id, name, latitude, longitude, target_temperature",
        )
        .bind(room_id)
        .bind(new_target)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CoreError::RoomNotFound(room_id))?;

        info!(room_id = %room_id, target = new_target, "Target temperature updated");
        Ok(room)
    }

    /// Removes a room. Its temperature readings go with it (the readings
    /// table cascades on room deletion).
    pub async fn delete(&self, room_id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::RoomNotFound(room_id));
        }
        info!(room_id = %room_id, "Room deleted");
        Ok(())
    }
}

pub(crate) fn validate_coordinate(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(CoreError::validation(format!(
            "latitude must be within [-90, 90], got {latitude}"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::validation(format!(
            "longitude must be within [-180, 180], got {longitude}"
        )));
    }
    Ok(())
}

fn validate_target(target: f64) -> Result<(), CoreError> {
    if !target.is_finite()
        || !(MIN_TARGET_TEMPERATURE..=MAX_TARGET_TEMPERATURE).contains(&target)
    {
        return Err(CoreError::validation(format!(
            "target temperature must be within [{MIN_TARGET_TEMPERATURE}, \
             {MAX_TARGET_TEMPERATURE}] °C, got {target}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::*;
    use crate::error::CoreError;

    #[test]
    fn coordinate_bounds() {
        assert!(validate_coordinate(52.52, 13.4).is_ok());
        assert!(validate_coordinate(90.0, 180.0).is_ok());
        assert!(validate_coordinate(-90.0, -180.0).is_ok());
        assert!(validate_coordinate(90.1, 0.0).is_err());
        assert!(validate_coordinate(0.0, -180.5).is_err());
        assert!(validate_coordinate(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn target_band() {
        assert!(validate_target(21.0).is_ok());
        assert!(validate_target(-50.0).is_ok());
        assert!(validate_target(50.0).is_ok());
        assert!(validate_target(-50.1).is_err());
        assert!(validate_target(50.1).is_err());
        assert!(validate_target(f64::INFINITY).is_err());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_then_get_roundtrip(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        let created = registry.create("bedroom", 52.52, 13.4, 19.5).await.unwrap();

        let fetched = registry.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.target_temperature, 19.5);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn get_unknown_room_is_room_not_found(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        let id = Uuid::new_v4();
        let err = registry.get(id).await.unwrap_err();
        assert!(matches!(err, CoreError::RoomNotFound(got) if got == id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_rejects_invalid_input(pool: PgPool) {
        let registry = RoomRegistry::new(pool);

        assert!(matches!(
            registry.create("", 52.52, 13.4, 21.0).await.unwrap_err(),
            CoreError::Validation(_)
        ));
        assert!(matches!(
            registry.create("attic", 99.0, 13.4, 21.0).await.unwrap_err(),
            CoreError::Validation(_)
        ));
        assert!(matches!(
            registry.create("attic", 52.52, 13.4, f64::NAN).await.unwrap_err(),
            CoreError::Validation(_)
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn set_target_updates_in_place(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        let room = registry.create("kitchen", 52.52, 13.4, 21.0).await.unwrap();

        let updated = registry.set_target(room.id, 18.0).await.unwrap();
        assert_eq!(updated.target_temperature, 18.0);
        assert_eq!(registry.get(room.id).await.unwrap().target_temperature, 18.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn set_target_on_unknown_room_is_room_not_found(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        let err = registry.set_target(Uuid::new_v4(), 18.0).await.unwrap_err();
        assert!(matches!(err, CoreError::RoomNotFound(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn set_target_rejects_out_of_band_values(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        let room = registry.create("kitchen", 52.52, 13.4, 21.0).await.unwrap();

        for bad in [f64::NAN, -51.0, 51.0] {
            let err = registry.set_target(room.id, bad).await.unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)));
        }
        // Failed updates leave the stored value untouched
        assert_eq!(registry.get(room.id).await.unwrap().target_temperature, 21.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn list_returns_all_rooms_sorted_by_name(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        assert!(registry.list().await.unwrap().is_empty());

        registry.create("kitchen", 52.52, 13.4, 21.0).await.unwrap();
        registry.create("attic", 52.52, 13.4, 17.0).await.unwrap();

        let names: Vec<String> = registry
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["attic", "kitchen"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_removes_room_and_its_readings(pool: PgPool) {
        let registry = RoomRegistry::new(pool.clone());
        let store = crate::readings::ReadingStore::new(pool);
        let room = registry.create("cellar", 52.52, 13.4, 15.0).await.unwrap();
        store.record(room.id, 14.0, chrono::Utc::now()).await.unwrap();

        registry.delete(room.id).await.unwrap();

        assert!(matches!(
            registry.get(room.id).await.unwrap_err(),
            CoreError::RoomNotFound(_)
        ));
        assert!(store.history(room.id, None, None).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_unknown_room_is_room_not_found(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        let id = Uuid::new_v4();
        let err = registry.delete(id).await.unwrap_err();
        assert!(matches!(err, CoreError::RoomNotFound(got) if got == id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn concurrent_set_target_converges_to_one_submitted_value(pool: PgPool) {
        let registry = RoomRegistry::new(pool);
        let room = registry.create("office", 52.52, 13.4, 21.0).await.unwrap();

        let submitted: Vec<f64> = (0..10).map(|i| 15.0 + i as f64 * 0.5).collect();
        let mut tasks = Vec::new();
        for target in &submitted {
            let registry = registry.clone();
            let room_id = room.id;
            let target = *target;
            tasks.push(tokio::spawn(async move {
                registry.set_target(room_id, target).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = registry.get(room.id).await.unwrap().target_temperature;
        assert!(
            submitted.contains(&stored),
            "stored target {stored} was never submitted"
        );
    }
}
