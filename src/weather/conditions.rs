//! Forecast payload parsing

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The `current` block of a forecast response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct CurrentConditions {
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    #[serde(deserialize_with = "int_like")]
    pub relative_humidity_2m: i32,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub rain: Option<f64>,
    pub wind_speed_10m: f64,
    #[serde(deserialize_with = "int_like")]
    pub wind_direction_10m: i32,
    #[serde(deserialize_with = "int_like")]
    pub cloud_cover: i32,
    pub surface_pressure: f64,
    #[serde(deserialize_with = "int_like")]
    pub weather_code: i32,
    pub time: String,
}

/// Extract current conditions from a forecast body.
///
/// The error string describes what was missing; it is for logs only.
pub(crate) fn parse_current(mut body: Value) -> Result<CurrentConditions, String> {
    let current = match body.get_mut("current") {
        Some(current) if current.is_object() => current.take(),
        Some(_) => return Err("`current` is not an object".to_string()),
        None => return Err("missing `current` object".to_string()),
    };

    serde_json::from_value(current).map_err(|e| e.to_string())
}

/// Accept whole numbers sent either as integers or as floats (`60` or `60.0`)
#[allow(clippy::cast_possible_truncation)]
fn int_like<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() && raw >= f64::from(i32::MIN) && raw <= f64::from(i32::MAX) {
        Ok(raw.round() as i32)
    } else {
        Err(serde::de::Error::custom(format!("{raw} is not a valid integer")))
    }
}
