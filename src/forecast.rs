//! Forecast engine: pure functions over a loaded weather table.
//!
//! Both endpoints follow the same shape: filter the table by time, split
//! it into the three sensor segments, then reduce each segment.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::{config::Thresholds, SensorKind, WeatherRecord};

// ---

/// Records split by sensor family, input order preserved in each.
#[derive(Debug, Default)]
pub struct SensorSegments<'a> {
    // ---
    pub temperature: Vec<&'a WeatherRecord>,
    pub irradiance: Vec<&'a WeatherRecord>,
    pub wind_speed: Vec<&'a WeatherRecord>,
}

impl<'a> SensorSegments<'a> {
    // ---
    pub fn get(&self, kind: SensorKind) -> &[&'a WeatherRecord] {
        match kind {
            SensorKind::Temperature => &self.temperature,
            SensorKind::Irradiance => &self.irradiance,
            SensorKind::WindSpeed => &self.wind_speed,
        }
    }

    fn get_mut(&mut self, kind: SensorKind) -> &mut Vec<&'a WeatherRecord> {
        match kind {
            SensorKind::Temperature => &mut self.temperature,
            SensorKind::Irradiance => &mut self.irradiance,
            SensorKind::WindSpeed => &mut self.wind_speed,
        }
    }
}

/// Body of `GET /forecasts/`.
#[derive(Debug, Serialize, PartialEq)]
pub struct Forecast {
    pub temperature: Option<WeatherRecord>,
    pub irradiance: Option<WeatherRecord>,
    pub wind_speed: Option<WeatherRecord>,
}

/// Body of `GET /tomorrow/`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TomorrowOutlook {
    pub is_warm: bool,
    pub is_sunny: bool,
    pub is_windy: bool,
}

/// Split records into the three sensor segments by substring match.
///
/// Records whose sensor matches no family are dropped. A sensor name
/// matching several families lands in each of them.
pub fn segregate<'a, I>(records: I) -> SensorSegments<'a>
where
    I: IntoIterator<Item = &'a WeatherRecord>,
{
    // ---
    let mut segments = SensorSegments::default();
    for record in records {
        for kind in SensorKind::ALL {
            if kind.matches(&record.sensor) {
                segments.get_mut(kind).push(record);
            }
        }
    }
    segments
}

/// The record with the largest belief horizon; on ties the one later in
/// the segment. Same result as a stable ascending sort taking the last.
pub fn latest_belief<'a>(segment: &[&'a WeatherRecord]) -> Option<&'a WeatherRecord> {
    // ---
    // max_by_key returns the last of equal maxima
    segment
        .iter()
        .copied()
        .max_by_key(|record| record.belief_horizon_in_sec)
}

/// Whether `record` starts within `[now, then]`, both ends inclusive.
pub fn within_window(record: &WeatherRecord, now: DateTime<Utc>, then: DateTime<Utc>) -> bool {
    // ---
    let start = record.event_start.with_timezone(&Utc);
    now <= start && start <= then
}

/// Latest belief per sensor among records starting within `[now, then]`.
pub fn forecast(records: &[WeatherRecord], now: DateTime<Utc>, then: DateTime<Utc>) -> Forecast {
    // ---
    let segments = segregate(records.iter().filter(|r| within_window(r, now, then)));

    tracing::debug!(
        "Window {} .. {}: {} temperature, {} irradiance, {} wind_speed candidates",
        now,
        then,
        segments.temperature.len(),
        segments.irradiance.len(),
        segments.wind_speed.len()
    );

    let pick = |kind: SensorKind| latest_belief(segments.get(kind)).cloned();
    Forecast {
        temperature: pick(SensorKind::Temperature),
        irradiance: pick(SensorKind::Irradiance),
        wind_speed: pick(SensorKind::WindSpeed),
    }
}

/// Threshold outlook for the calendar day after `now`.
///
/// `now` is taken at its wall-clock reading. A record belongs to the
/// target day when its `event_start` date, in its own offset, matches.
pub fn tomorrow(records: &[WeatherRecord], now: NaiveDateTime, thresholds: &Thresholds) -> TomorrowOutlook {
    // ---
    // None only at the end of chrono's calendar, where nothing can match
    let target = now.date().succ_opt();
    let segments = segregate(
        records
            .iter()
            .filter(|r| Some(r.event_start.date_naive()) == target),
    );

    tracing::debug!(
        "Tomorrow {:?}: {} temperature, {} irradiance, {} wind_speed records",
        target,
        segments.temperature.len(),
        segments.irradiance.len(),
        segments.wind_speed.len()
    );

    let exceeds = |kind: SensorKind| {
        let threshold = thresholds.for_sensor(kind) as f64;
        segments
            .get(kind)
            .iter()
            .any(|record| record.event_value >= threshold)
    };

    TomorrowOutlook {
        is_warm: exceeds(SensorKind::Temperature),
        is_sunny: exceeds(SensorKind::Irradiance),
        is_windy: exceeds(SensorKind::WindSpeed),
    }
}
