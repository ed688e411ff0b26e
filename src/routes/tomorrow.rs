use std::collections::HashMap;

use axum::{extract::Query, extract::State, routing::get, Json, Router};
use tracing::{debug, info};

use crate::{
    dataset::load_dataset_blocking,
    datetime::parse_iso_datetime,
    error::ApiError,
    forecast::{tomorrow, TomorrowOutlook},
    Config,
};

// ---

pub fn router() -> Router<Config> {
    // ---
    Router::new().route("/tomorrow/", get(handler))
}

/// Query parameters for the next-day outlook
#[derive(Debug)]
pub struct TomorrowQuery {
    now: Option<String>,
}

impl From<HashMap<String, String>> for TomorrowQuery {
    // ---
    /// A repeated key keeps its last value.
    fn from(mut params: HashMap<String, String>) -> Self {
        Self {
            now: params.remove("now"),
        }
    }
}

async fn handler(
    Query(params): Query<HashMap<String, String>>,
    State(config): State<Config>,
) -> Result<Json<TomorrowOutlook>, ApiError> {
    // ---
    let params = TomorrowQuery::from(params);
    info!("GET /tomorrow/ - {:?}", params);

    let now = params.now.as_deref().ok_or(ApiError::MissingParameter)?;

    // Unlike /forecasts/, the supplied wall-clock reading is used as is
    let now = parse_iso_datetime(now).map_err(|_| ApiError::InvalidDatetime)?.naive();

    let records = load_dataset_blocking(config.data_file.clone()).await?;
    debug!("GET /tomorrow/ - {} records loaded", records.len());

    let outlook = tomorrow(&records, now, &config.thresholds);
    debug!("GET /tomorrow/ - Returning {:?}", outlook);
    Ok(Json(outlook))
}

#[cfg(test)]
mod tests {
    // ---
    use crate::routes::test_support::{app_with_csv, get_json, test_config};
    use axum::http::StatusCode;

    const TOMORROW_ROWS: &str = "\
2020-11-02 00:00:00+00,3600,25,temperature,°C
2020-11-02 00:00:00+00,7200,800,irradiance,
";

    #[tokio::test]
    async fn reports_thresholds_for_next_day() {
        // ---
        let (app, _file) = app_with_csv(TOMORROW_ROWS);
        let (status, body) = get_json(app, "/tomorrow/?now=2020-11-01T00:00:00.0000").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({ "is_warm": true, "is_sunny": true, "is_windy": false })
        );
    }

    #[tokio::test]
    async fn other_days_are_ignored() {
        // ---
        let (app, _file) = app_with_csv(TOMORROW_ROWS);
        let (status, body) = get_json(app, "/tomorrow/?now=2020-11-02T00:00:00").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({ "is_warm": false, "is_sunny": false, "is_windy": false })
        );
    }

    #[tokio::test]
    async fn offset_on_now_does_not_shift_the_day() {
        // ---
        // 23:00-05:00 is already the 2nd in UTC, but the wall-clock date is
        // the 1st, so tomorrow is still the 2nd
        let (app, _file) = app_with_csv(TOMORROW_ROWS);
        let (status, body) = get_json(app, "/tomorrow/?now=2020-11-01T23:00:00-05:00").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_warm"], true);
    }

    #[tokio::test]
    async fn repeated_now_uses_last_value() {
        // ---
        let (app, _file) = app_with_csv(TOMORROW_ROWS);
        let (status, body) = get_json(
            app,
            "/tomorrow/?now=2020-11-05T00:00:00&now=2020-11-01T00:00:00",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_warm"], true);
        assert_eq!(body["is_sunny"], true);
    }

    #[tokio::test]
    async fn missing_now_is_bad_request() {
        // ---
        let (app, _file) = app_with_csv(TOMORROW_ROWS);
        let (status, body) = get_json(app, "/tomorrow/").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Both parameters are required");
    }

    #[tokio::test]
    async fn invalid_datetime_is_bad_request() {
        // ---
        let (app, _file) = app_with_csv(TOMORROW_ROWS);
        let (status, body) = get_json(app, "/tomorrow/?now=not-a-date").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Invalid datetime format. Please provide ISO format datetime string."
        );
    }

    #[tokio::test]
    async fn missing_dataset_is_service_unavailable() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let app = crate::routes::router(test_config(dir.path().join("absent.csv")));
        let (status, _body) = get_json(app, "/tomorrow/?now=2020-11-01").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
