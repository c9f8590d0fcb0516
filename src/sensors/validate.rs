use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::db::models::NewReading;

/// Fields every incoming reading must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "temperature",
    "humidity",
    "water_sensor",
    "sensor_pir",
    "sensor_api",
    "servo",
];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON body")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid value for field: {0}")]
    InvalidField(&'static str),
}

/// Returns the required fields that are absent or `null`, or `None` when the
/// payload is complete. `false` and `0` are present values.
pub fn missing_fields(payload: &Map<String, Value>) -> Option<Vec<&'static str>> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| payload.get(*field).map_or(true, Value::is_null))
        .collect();

    (!missing.is_empty()).then_some(missing)
}

/// Parse a raw request body into a reading ready to be stored.
///
/// Checks run in order: JSON syntax, object shape, required fields, then the
/// type of each field. Keys outside [`REQUIRED_FIELDS`] are ignored, so a
/// client cannot choose its own `created_at`.
pub fn parse_payload(body: &[u8]) -> Result<NewReading, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(ValidationError::MalformedJson)?;
    let Value::Object(payload) = value else {
        return Err(ValidationError::NotAnObject);
    };

    if let Some(missing) = missing_fields(&payload) {
        return Err(ValidationError::MissingFields(missing));
    }

    Ok(NewReading {
        temperature: numeric(&payload, "temperature")?,
        humidity: numeric(&payload, "humidity")?,
        water_sensor: flag(&payload, "water_sensor")?,
        sensor_pir: flag(&payload, "sensor_pir")?,
        sensor_api: flag(&payload, "sensor_api")?,
        servo: flag(&payload, "servo")?,
    })
}

// ---------------------------------------------------------------------------
// Loosely typed field values
//
// Devices send whatever their firmware produces: numbers may arrive as
// strings, flags as booleans, 0/1 or text. Untagged enums try each variant in
// order; Bool MUST come before the numeric variants.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumericValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumericValue {
    fn as_f64(&self) -> Option<f64> {
        let v = match self {
            NumericValue::Number(v) => *v,
            NumericValue::Text(s) => s.trim().parse().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

impl FlagValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(v) => Some(*v),
            FlagValue::Integer(0) => Some(false),
            FlagValue::Integer(1) => Some(true),
            FlagValue::Integer(_) => None,
            FlagValue::Float(v) if *v == 0.0 => Some(false),
            FlagValue::Float(v) if *v == 1.0 => Some(true),
            FlagValue::Float(_) => None,
            FlagValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

fn field<T>(payload: &Map<String, Value>, name: &'static str) -> Result<T, ValidationError>
where
    T: for<'de> Deserialize<'de>,
{
    payload
        .get(name)
        .cloned()
        .ok_or(ValidationError::InvalidField(name))
        .and_then(|v| serde_json::from_value(v).map_err(|_| ValidationError::InvalidField(name)))
}

fn numeric(payload: &Map<String, Value>, name: &'static str) -> Result<f64, ValidationError> {
    field::<NumericValue>(payload, name)?
        .as_f64()
        .ok_or(ValidationError::InvalidField(name))
}

fn flag(payload: &Map<String, Value>, name: &'static str) -> Result<bool, ValidationError> {
    field::<FlagValue>(payload, name)?
        .as_bool()
        .ok_or(ValidationError::InvalidField(name))
}
