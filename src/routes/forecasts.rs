use std::collections::HashMap;

use axum::{extract::Query, extract::State, routing::get, Json, Router};
use tracing::{debug, info};

use crate::{
    dataset::load_dataset_blocking,
    datetime::parse_iso_datetime,
    error::ApiError,
    forecast::{forecast, Forecast},
    Config,
};

// ---

pub fn router() -> Router<Config> {
    // ---
    Router::new().route("/forecasts/", get(handler))
}

/// Query parameters for the time-window forecast
#[derive(Debug)]
pub struct ForecastQuery {
    now: Option<String>,
    then: Option<String>,
}

impl From<HashMap<String, String>> for ForecastQuery {
    // ---
    /// A repeated key keeps its last value.
    fn from(mut params: HashMap<String, String>) -> Self {
        Self {
            now: params.remove("now"),
            then: params.remove("then"),
        }
    }
}

async fn handler(
    Query(params): Query<HashMap<String, String>>,
    State(config): State<Config>,
) -> Result<Json<Forecast>, ApiError> {
    // ---
    let params = ForecastQuery::from(params);
    info!("GET /forecasts/ - {:?}", params);

    let (Some(now), Some(then)) = (params.now.as_deref(), params.then.as_deref()) else {
        return Err(ApiError::MissingParameter);
    };

    let now = parse_iso_datetime(now).map_err(|_| ApiError::InvalidDatetime)?;
    let then = parse_iso_datetime(then).map_err(|_| ApiError::InvalidDatetime)?;

    // Offsets are dropped and the wall-clock time read as UTC
    if now.offset().is_some() || then.offset().is_some() {
        debug!("GET /forecasts/ - Discarding supplied UTC offsets");
    }
    let (now, then) = (now.as_utc_tagged(), then.as_utc_tagged());

    let records = load_dataset_blocking(config.data_file.clone()).await?;
    debug!("GET /forecasts/ - {} records loaded", records.len());

    let result = forecast(&records, now, then);
    debug!("GET /forecasts/ - Returning OK");
    Ok(Json(result))
}
