//! Request-level error taxonomy and its HTTP mapping.
//!
//! Every failure a handler can hit ends up here and is rendered as a JSON
//! body of the form `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dataset::DatasetError;

// ---

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Both parameters are required")]
    MissingParameter,

    #[error("Invalid datetime format. Please provide ISO format datetime string.")]
    InvalidDatetime,

    #[error("Weather data is currently unavailable")]
    DataUnavailable(#[from] DatasetError),
}

impl ApiError {
    // ---
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter | ApiError::InvalidDatetime => StatusCode::BAD_REQUEST,
            ApiError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        match &self {
            ApiError::DataUnavailable(source) => {
                tracing::error!("Dataset load failed: {}", error_chain(source));
            }
            other => tracing::warn!("Rejected request: {}", other),
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Render an error and all of its sources on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    // ---
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
