pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    decision::DecisionService, readings::ReadingStore, rooms::RoomRegistry,
    weather::WeatherClient,
};
use handlers::ApiDoc;

/// Shared handler state: store handles and the weather client, passed
/// explicitly per request — no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomRegistry,
    pub readings: ReadingStore,
    pub decisions: DecisionService,
    pub weather: WeatherClient,
}

impl AppState {
    pub fn new(pool: PgPool, weather: WeatherClient) -> Self {
        let rooms = RoomRegistry::new(pool.clone());
        let readings = ReadingStore::new(pool);
        let decisions = DecisionService::new(rooms.clone(), readings.clone(), weather.clone());
        Self {
            rooms,
            readings,
            decisions,
            weather,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/health", get(handlers::health))
        .route(
            "/rooms",
            post(handlers::create_room).get(handlers::list_rooms),
        )
        .route(
            "/rooms/{room_id}",
            get(handlers::get_room).delete(handlers::delete_room),
        )
        .route("/rooms/{room_id}/target", put(handlers::set_room_target))
        .route("/rooms/{room_id}/readings", get(handlers::get_room_readings))
        .route(
            "/rooms/{room_id}/readings/latest",
            get(handlers::get_latest_reading),
        )
        .route(
            "/rooms/{room_id}/heating",
            get(handlers::get_heating_decision),
        )
        .route("/readings", post(handlers::ingest_reading))
        .route("/readings/batch", post(handlers::ingest_reading_batch))
        .route("/weather", get(handlers::get_current_weather))
        .with_state(state)
        .split_for_parts();

    router.route(
        "/api-docs/openapi.json",
        get(move || async move { axum::Json(api) }),
    )
}
