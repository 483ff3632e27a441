//! HTTP request handlers for the weather API.

pub mod health;
pub mod weather;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use weather_common::WeatherError;

/// JSON body for request-level errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub description: String,
}

impl From<&WeatherError> for ErrorBody {
    fn from(err: &WeatherError) -> Self {
        Self {
            code: err.error_code().to_string(),
            description: err.to_string(),
        }
    }
}

pub fn error_response(err: &WeatherError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let json = serde_json::to_string(&ErrorBody::from(err)).unwrap_or_default();
    (status, [(header::CONTENT_TYPE, "application/json")], json).into_response()
}
