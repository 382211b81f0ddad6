use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::OpenApi;
use uuid::Uuid;

use super::{
    dto::{
        BatchReadingEntry, CreateRoomRequest, IngestReadingBatchRequest, IngestReadingRequest,
        RoomDto, TemperatureReadingDto, UpdateTargetRequest,
    },
    errors::AppError,
    AppState,
};
use crate::{
    decision::HeatingDecision,
    rooms::validate_coordinate,
    weather::models::WeatherSnapshot,
};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TimeRangeParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// Register a new room with its coordinate and initial target temperature.
#[utoipa::path(
    post,
    path = "/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomDto),
        (status = 400, description = "Invalid name, coordinate or target"),
    ),
    tag = "rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), AppError> {
    let room = state
        .rooms
        .create(&req.name, req.latitude, req.longitude, req.target_temperature)
        .await?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

/// List all registered rooms.
#[utoipa::path(
    get,
    path = "/rooms",
    responses(
        (status = 200, description = "Registered rooms", body = Vec<RoomDto>),
    ),
    tag = "rooms"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoomDto>>, AppError> {
    let rooms = state.rooms.list().await?;
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// Fetch a room by ID.
#[utoipa::path(
    get,
    path = "/rooms/{room_id}",
    params(
        ("room_id" = Uuid, Path, description = "Room ID"),
    ),
    responses(
        (status = 200, description = "Room", body = RoomDto),
        (status = 404, description = "Room not found"),
    ),
    tag = "rooms"
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<RoomDto>, AppError> {
    let room = state.rooms.get(room_id).await?;
    Ok(Json(room.into()))
}

/// Update a room's target temperature. Last writer wins; the previous value
/// is not kept.
#[utoipa::path(
    put,
    path = "/rooms/{room_id}/target",
    params(
        ("room_id" = Uuid, Path, description = "Room ID"),
    ),
    request_body = UpdateTargetRequest,
    responses(
        (status = 200, description = "Updated room", body = RoomDto),
        (status = 400, description = "Target non-finite or outside the operating band"),
        (status = 404, description = "Room not found"),
    ),
    tag = "rooms"
)]
pub async fn set_room_target(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    Json(req): Json<UpdateTargetRequest>,
) -> Result<Json<RoomDto>, AppError> {
    let room = state.rooms.set_target(room_id, req.target_temperature).await?;
    Ok(Json(room.into()))
}

/// Delete a room together with all of its temperature readings.
#[utoipa::path(
    delete,
    path = "/rooms/{room_id}",
    params(
        ("room_id" = Uuid, Path, description = "Room ID"),
    ),
    responses(
        (status = 204, description = "Room and its readings deleted"),
        (status = 404, description = "Room not found"),
    ),
    tag = "rooms"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.rooms.delete(room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Ingest a single temperature reading. `recorded_at` defaults to the
/// server receipt time when omitted.
#[utoipa::path(
    post,
    path = "/readings",
    request_body = IngestReadingRequest,
    responses(
        (status = 201, description = "Reading recorded", body = TemperatureReadingDto),
        (status = 400, description = "Non-finite value"),
        (status = 404, description = "Room not found"),
    ),
    tag = "readings"
)]
pub async fn ingest_reading(
    State(state): State<AppState>,
    Json(req): Json<IngestReadingRequest>,
) -> Result<(StatusCode, Json<TemperatureReadingDto>), AppError> {
    // Readings are only accepted for registered rooms.
    state.rooms.get(req.room_id).await?;
    let recorded_at = req.recorded_at.unwrap_or_else(Utc::now);
    let reading = state.readings.record(req.room_id, req.value, recorded_at).await?;
    Ok((StatusCode::CREATED, Json(reading.into())))
}

/// Ingest up to 100 readings for one room in a single call.
#[utoipa::path(
    post,
    path = "/readings/batch",
    request_body = IngestReadingBatchRequest,
    responses(
        (status = 201, description = "Readings recorded", body = Vec<TemperatureReadingDto>),
        (status = 400, description = "Batch too large or a non-finite value"),
        (status = 404, description = "Room not found"),
    ),
    tag = "readings"
)]
pub async fn ingest_reading_batch(
    State(state): State<AppState>,
    Json(req): Json<IngestReadingBatchRequest>,
) -> Result<(StatusCode, Json<Vec<TemperatureReadingDto>>), AppError> {
    state.rooms.get(req.room_id).await?;
    let entries: Vec<_> = req
        .readings
        .iter()
        .map(|e| (e.value, e.recorded_at.unwrap_or_else(Utc::now)))
        .collect();
    let recorded = state.readings.record_batch(req.room_id, &entries).await?;
    Ok((
        StatusCode::CREATED,
        Json(recorded.into_iter().map(Into::into).collect()),
    ))
}

/// Fetch a room's readings in ascending time order, optionally bounded with
/// `?from=<RFC3339>&to=<RFC3339>`.
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/readings",
    params(
        ("room_id" = Uuid, Path, description = "Room ID"),
        ("from" = Option<DateTime<Utc>>, Query, description = "Start of time range (RFC3339)"),
        ("to"   = Option<DateTime<Utc>>, Query, description = "End of time range (RFC3339)"),
    ),
    responses(
        (status = 200, description = "Readings", body = Vec<TemperatureReadingDto>),
        (status = 404, description = "Room not found"),
    ),
    tag = "readings"
)]
pub async fn get_room_readings(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Json<Vec<TemperatureReadingDto>>, AppError> {
    state.rooms.get(room_id).await?;
    let rows = state.readings.history(room_id, params.from, params.to).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Fetch the latest reading for a room. A room with no readings yet is an
/// explicit 404 (`no_reading_available`), never a default value.
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/readings/latest",
    params(
        ("room_id" = Uuid, Path, description = "Room ID"),
    ),
    responses(
        (status = 200, description = "Latest reading", body = TemperatureReadingDto),
        (status = 404, description = "Room not found, or no reading recorded yet"),
    ),
    tag = "readings"
)]
pub async fn get_latest_reading(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<TemperatureReadingDto>, AppError> {
    state.rooms.get(room_id).await?;
    let reading = state.readings.latest(room_id).await?;
    Ok(Json(reading.into()))
}

// ---------------------------------------------------------------------------
// Heating decision
// ---------------------------------------------------------------------------

/// Compute the heating recommendation for a room from its latest reading,
/// its target temperature and current outdoor weather.
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/heating",
    params(
        ("room_id" = Uuid, Path, description = "Room ID"),
    ),
    responses(
        (status = 200, description = "Heating decision", body = HeatingDecision),
        (status = 404, description = "Room not found, or no reading recorded yet"),
        (status = 502, description = "Weather provider unavailable or returned garbage"),
        (status = 504, description = "Weather provider timed out"),
    ),
    tag = "heating"
)]
pub async fn get_heating_decision(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<HeatingDecision>, AppError> {
    let decision = state.decisions.evaluate(room_id).await?;
    Ok(Json(decision))
}

// ---------------------------------------------------------------------------
// Weather pass-through
// ---------------------------------------------------------------------------

/// Fetch current outdoor conditions for an arbitrary coordinate.
#[utoipa::path(
    get,
    path = "/weather",
    params(
        ("latitude" = f64, Query, description = "Latitude in [-90, 90]"),
        ("longitude" = f64, Query, description = "Longitude in [-180, 180]"),
    ),
    responses(
        (status = 200, description = "Current weather", body = WeatherSnapshot),
        (status = 400, description = "Coordinate out of range"),
        (status = 502, description = "Weather provider unavailable or returned garbage"),
        (status = 504, description = "Weather provider timed out"),
    ),
    tag = "weather"
)]
pub async fn get_current_weather(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<WeatherSnapshot>, AppError> {
    validate_coordinate(params.latitude, params.longitude)?;
    let snapshot = state.weather.current(params.latitude, params.longitude).await?;
    Ok(Json(snapshot))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        create_room,
        list_rooms,
        get_room,
        set_room_target,
        delete_room,
        ingest_reading,
        ingest_reading_batch,
        get_room_readings,
        get_latest_reading,
        get_heating_decision,
        get_current_weather,
        health,
    ),
    components(schemas(
        CreateRoomRequest,
        UpdateTargetRequest,
        RoomDto,
        IngestReadingRequest,
        IngestReadingBatchRequest,
        BatchReadingEntry,
        TemperatureReadingDto,
        HeatingDecision,
        WeatherSnapshot,
    )),
    tags(
        (name = "rooms",    description = "Room registry endpoints"),
        (name = "readings", description = "Temperature ingestion and retrieval"),
        (name = "heating",  description = "Heating decision endpoint"),
        (name = "weather",  description = "Weather gateway pass-through"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Heat Control API",
        version = "0.1.0",
        description = "Per-room heating recommendations from indoor readings, \
                       configured targets and outdoor weather"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
