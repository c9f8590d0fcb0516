use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SensorReadingDto {
    pub id: Uuid,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Water detected.
    pub water_sensor: bool,
    /// Motion detected.
    pub sensor_pir: bool,
    /// Fire / flame detected.
    pub sensor_api: bool,
    /// `true` = closed, `false` = locked.
    pub servo: bool,
    /// Server-assigned insert time (RFC3339).
    pub created_at: DateTime<Utc>,
}

impl From<crate::db::models::SensorReading> for SensorReadingDto {
    fn from(r: crate::db::models::SensorReading) -> Self {
        Self {
            id: r.id,
            temperature: r.temperature,
            humidity: r.humidity,
            water_sensor: r.water_sensor,
            sensor_pir: r.sensor_pir,
            sensor_api: r.sensor_api,
            servo: r.servo,
            created_at: r.created_at,
        }
    }
}

/// Request body for `POST /api/sensors`.
///
/// Documentation only: the handler parses the raw body so that missing and
/// loosely typed fields produce the envelope errors instead of an extractor
/// rejection. Flags also accept `0`/`1` and `"true"`/`"false"`; numbers also
/// accept numeric strings.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct CreateReadingRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub water_sensor: bool,
    pub sensor_pir: bool,
    pub sensor_api: bool,
    pub servo: bool,
}

/// `201` body of `POST /api/sensors`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
    pub data: SensorReadingDto,
}

/// `200` body of `GET /api/sensors`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<SensorReadingDto>,
}

/// Body of every `4xx`/`5xx` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Optional window over `GET /api/sensors`. Without parameters every reading
/// is returned.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Maximum number of readings to return.
    pub limit: Option<u32>,
    /// Number of readings to skip, counted from the oldest.
    pub offset: Option<u32>,
}

impl From<ListParams> for crate::sensors::Page {
    fn from(p: ListParams) -> Self {
        Self {
            limit: p.limit,
            offset: p.offset.unwrap_or(0),
        }
    }
}
