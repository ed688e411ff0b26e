//! Data models for the weather belief dataset.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::datetime::parse_iso_datetime;

// ---

/// One row of the weather dataset: a belief about a sensor value at
/// `event_start`, formed `belief_horizon_in_sec` seconds before it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WeatherRecord {
    // ---
    #[serde(
        deserialize_with = "deserialize_event_start",
        serialize_with = "serialize_event_start"
    )]
    pub event_start: DateTime<FixedOffset>,
    #[serde(deserialize_with = "deserialize_horizon")]
    pub belief_horizon_in_sec: i64,
    /// NaN when the source cell is empty; serialized as `null`.
    #[serde(deserialize_with = "deserialize_event_value")]
    pub event_value: f64,
    pub sensor: String,
    pub unit: Option<String>,
}

/// The three sensor families the service reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Irradiance,
    WindSpeed,
}

impl SensorKind {
    // ---
    pub const ALL: [SensorKind; 3] = [
        SensorKind::Temperature,
        SensorKind::Irradiance,
        SensorKind::WindSpeed,
    ];

    /// Substring a sensor name must contain to belong to this family.
    pub fn needle(self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Irradiance => "irradiance",
            SensorKind::WindSpeed => "wind_speed",
        }
    }

    /// Case-sensitive substring match, so `temperature_2m` is a temperature.
    pub fn matches(self, sensor: &str) -> bool {
        sensor.contains(self.needle())
    }
}

fn deserialize_event_start<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let raw = String::deserialize(deserializer)?;
    parse_iso_datetime(raw.trim())
        .map(|parsed| parsed.to_fixed_offset())
        .map_err(serde::de::Error::custom)
}

/// Whole seconds, also accepted in float notation such as `3600.0`.
fn deserialize_horizon<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if let Ok(seconds) = raw.parse::<i64>() {
        return Ok(seconds);
    }

    match raw.parse::<f64>() {
        Ok(seconds) if seconds.fract() == 0.0 && seconds.abs() < i64::MAX as f64 => Ok(seconds as i64),
        _ => Err(serde::de::Error::custom(format!(
            "belief_horizon_in_sec {raw:?} is not a whole number of seconds"
        ))),
    }
}

fn deserialize_event_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn serialize_event_start<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // ---
    let rendered = if value.offset().local_minus_utc() == 0 {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    } else {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    };
    serializer.serialize_str(&rendered)
}
