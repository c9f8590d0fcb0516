use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `sensors` table. Rows are append-only.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: Uuid,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    pub water_sensor: bool,
    /// Motion detected by the PIR sensor.
    pub sensor_pir: bool,
    /// Flame detected.
    pub sensor_api: bool,
    /// Actuator position: `true` is closed.
    pub servo: bool,
    /// Assigned by the server at insert time.
    pub created_at: DateTime<Utc>,
}

/// A validated reading that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
    pub water_sensor: bool,
    pub sensor_pir: bool,
    pub sensor_api: bool,
    pub servo: bool,
}

impl NewReading {
    pub fn into_stored(self, id: Uuid, created_at: DateTime<Utc>) -> SensorReading {
        SensorReading {
            id,
            temperature: self.temperature,
            humidity: self.humidity,
            water_sensor: self.water_sensor,
            sensor_pir: self.sensor_pir,
            sensor_api: self.sensor_api,
            servo: self.servo,
            created_at,
        }
    }
}
