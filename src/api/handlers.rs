use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::Utc;
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{
        CreateReadingRequest, CreatedResponse, ErrorResponse, ListParams, ListResponse,
        SensorReadingDto,
    },
    errors::ApiError,
};
use crate::{
    dashboard::{ChartSeries, DashboardView, LatestWidgets},
    sensors::{validate, Page, SharedStore},
};

pub const CREATED_MESSAGE: &str = "Sensor data added successfully!";

// ---------------------------------------------------------------------------
// Sensor readings
// ---------------------------------------------------------------------------

/// Validate and store one reading. `created_at` is assigned here, never taken
/// from the client.
#[utoipa::path(
    post,
    path = "/api/sensors",
    request_body = CreateReadingRequest,
    responses(
        (status = 201, description = "Reading stored", body = CreatedResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn create_reading(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let reading = validate::parse_payload(&body)?;

    let row = store
        .insert(reading, Utc::now())
        .await
        .map_err(ApiError::Insert)?;

    info!(id = %row.id, temperature = row.temperature, humidity = row.humidity, "Sensor reading stored");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            message: CREATED_MESSAGE.to_owned(),
            data: row.into(),
        }),
    ))
}

/// Every stored reading, oldest first. `limit`/`offset` are optional.
#[utoipa::path(
    get,
    path = "/api/sensors",
    params(ListParams),
    responses(
        (status = 200, description = "Stored readings ordered by created_at ASC", body = ListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn list_readings(
    State(store): State<SharedStore>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(params) = params.map_err(ApiError::InvalidQuery)?;

    let rows = store
        .list(params.into())
        .await
        .map_err(ApiError::List)?;

    Ok(Json(ListResponse {
        success: true,
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Cross-origin preflight. The permissive headers are added by the router.
#[utoipa::path(
    options,
    path = "/api/sensors",
    responses(
        (status = 204, description = "Preflight accepted"),
    ),
    tag = "sensors"
)]
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Latest-value widgets and chart series computed from all readings.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard view", body = DashboardView),
        (status = 500, description = "Database error", body = ErrorResponse),
    ),
    tag = "dashboard"
)]
pub async fn dashboard(State(store): State<SharedStore>) -> Result<Json<DashboardView>, ApiError> {
    let rows = store.list(Page::all()).await.map_err(ApiError::List)?;
    let readings: Vec<SensorReadingDto> = rows.into_iter().map(Into::into).collect();
    Ok(Json(DashboardView::from_readings(&readings)))
}

const DASHBOARD_PAGE: &str = include_str!("../../static/dashboard.html");

pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
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
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(create_reading, list_readings, preflight, dashboard, health),
    components(schemas(
        SensorReadingDto,
        CreateReadingRequest,
        CreatedResponse,
        ListResponse,
        ErrorResponse,
        DashboardView,
        LatestWidgets,
        ChartSeries,
    )),
    tags(
        (name = "sensors",   description = "Sensor reading ingestion and queries"),
        (name = "dashboard", description = "Dashboard view model"),
        (name = "system",    description = "System endpoints"),
    ),
    info(
        title = "Room Monitor API",
        version = "0.1.0",
        description = "IoT telemetry ingestion and query API for the room monitoring dashboard"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
