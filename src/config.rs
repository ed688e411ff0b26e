//! Configuration loader for the `weather-beliefs` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Handlers receive the resulting [`Config`] as router
//! state; nothing else in the crate reads the environment.
//!
use std::{
    env,
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
};

use anyhow::{anyhow, Result};

use crate::SensorKind;

/// Parse an optional environment variable with a default value.
macro_rules! parse_env_or {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional numeric threshold, truncated toward zero to an integer.
macro_rules! parse_env_threshold {
    ($var_name:expr, $default:expr) => {
        coerce_threshold($var_name, parse_env_or!($var_name, f64, $default))?
    };
}

/// Sensor thresholds for the tomorrow outlook, already coerced to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    // ---
    /// Minimum temperature for a warm day.
    pub warm: i64,

    /// Minimum irradiance for a sunny day.
    pub sunny: i64,

    /// Minimum wind speed for a windy day.
    pub windy: i64,
}

impl Thresholds {
    // ---
    pub fn for_sensor(&self, kind: SensorKind) -> i64 {
        match kind {
            SensorKind::Temperature => self.warm,
            SensorKind::Irradiance => self.sunny,
            SensorKind::WindSpeed => self.windy,
        }
    }
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Path of the CSV weather dataset, read on every request.
    pub data_file: PathBuf,

    pub thresholds: Thresholds,

    /// Address the HTTP server binds to.
    pub bind_addr: IpAddr,

    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `WEATHER_DATAFILE` – CSV dataset path (default: `data/weather.csv`)
/// - `WARM_THRESHOLD` – temperature threshold (default: 20)
/// - `SUNNY_THRESHOLD` – irradiance threshold (default: 500)
/// - `WINDY_THRESHOLD` – wind speed threshold (default: 10)
/// - `BIND_ADDR` – listen address (default: 0.0.0.0)
/// - `PORT` – listen port (default: 8080)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let data_file = env::var("WEATHER_DATAFILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/weather.csv"));

    let thresholds = Thresholds {
        warm: parse_env_threshold!("WARM_THRESHOLD", 20.0),
        sunny: parse_env_threshold!("SUNNY_THRESHOLD", 500.0),
        windy: parse_env_threshold!("WINDY_THRESHOLD", 10.0),
    };

    let bind_addr = parse_env_or!("BIND_ADDR", IpAddr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let port = parse_env_or!("PORT", u16, 8080);

    Ok(Config {
        data_file,
        thresholds,
        bind_addr,
        port,
    })
}

/// Truncate a threshold toward zero, rejecting values with no integer form.
fn coerce_threshold(name: &str, value: f64) -> Result<i64> {
    // ---
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(anyhow!("Invalid {}: {} is not an integer-representable number", name, value));
    }
    Ok(value.trunc() as i64)
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  WEATHER_DATAFILE : {}", self.data_file.display());
        tracing::info!("  WARM_THRESHOLD   : {}", self.thresholds.warm);
        tracing::info!("  SUNNY_THRESHOLD  : {}", self.thresholds.sunny);
        tracing::info!("  WINDY_THRESHOLD  : {}", self.thresholds.windy);
        tracing::info!("  BIND_ADDR        : {}", self.bind_addr);
        tracing::info!("  PORT             : {}", self.port);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_threshold_truncates_toward_zero() {
        // ---
        assert_eq!(coerce_threshold("WARM_THRESHOLD", 25.9).unwrap(), 25);
        assert_eq!(coerce_threshold("WARM_THRESHOLD", -3.7).unwrap(), -3);
        assert_eq!(coerce_threshold("WARM_THRESHOLD", 800.0).unwrap(), 800);
    }

    #[test]
    fn test_threshold_rejects_non_finite() {
        // ---
        assert!(coerce_threshold("SUNNY_THRESHOLD", f64::NAN).is_err());
        assert!(coerce_threshold("SUNNY_THRESHOLD", f64::INFINITY).is_err());
    }

    #[test]
    fn test_thresholds_by_sensor() {
        // ---
        let thresholds = Thresholds {
            warm: 20,
            sunny: 500,
            windy: 10,
        };
        assert_eq!(thresholds.for_sensor(SensorKind::Temperature), 20);
        assert_eq!(thresholds.for_sensor(SensorKind::Irradiance), 500);
        assert_eq!(thresholds.for_sensor(SensorKind::WindSpeed), 10);
    }
}
