//! GET /weather - everything known about one coordinate.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::instrument;
use weather_common::{WeatherError, WeatherResult};

use super::error_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WeatherQueryParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl WeatherQueryParams {
    /// Parse both coordinates. Range checks happen in the aggregator.
    pub fn parse(&self) -> WeatherResult<(f64, f64)> {
        let latitude = parse_coord("latitude", self.latitude.as_deref())?;
        let longitude = parse_coord("longitude", self.longitude.as_deref())?;
        Ok((latitude, longitude))
    }
}

fn parse_coord(param: &str, raw: Option<&str>) -> WeatherResult<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| WeatherError::MissingParameter(param.to_string()))?;

    let value: f64 = raw.parse().map_err(|_| WeatherError::InvalidParameter {
        param: param.to_string(),
        message: format!("'{}' is not a number", raw),
    })?;

    if !value.is_finite() {
        return Err(WeatherError::InvalidParameter {
            param: param.to_string(),
            message: format!("'{}' is not a finite number", raw),
        });
    }
    Ok(value)
}

#[instrument(skip(state))]
pub async fn weather_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<WeatherQueryParams>,
) -> Response {
    let (latitude, longitude) = match params.parse() {
        Ok(coords) => coords,
        Err(e) => return error_response(&e),
    };

    match state.aggregator.get_weather(latitude, longitude).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, lon: Option<&str>) -> WeatherQueryParams {
        WeatherQueryParams {
            latitude: lat.map(String::from),
            longitude: lon.map(String::from),
        }
    }

    #[test]
    fn test_parse_ok() {
        let (lat, lon) = tokio_test::assert_ok!(params(Some("37.5665"), Some(" 126.978 ")).parse());
        assert_eq!(lat, 37.5665);
        assert_eq!(lon, 126.978);
    }

    #[test]
    fn test_missing() {
        let err = params(None, Some("127")).parse().unwrap_err();
        assert!(matches!(err, WeatherError::MissingParameter(ref p) if p == "latitude"));

        let err = params(Some("37"), Some("")).parse().unwrap_err();
        assert!(matches!(err, WeatherError::MissingParameter(ref p) if p == "longitude"));
    }

    #[test]
    fn test_invalid() {
        let err = params(Some("north"), Some("127")).parse().unwrap_err();
        assert_eq!(err.error_code(), "InvalidParameterValue");

        let err = params(Some("37"), Some("NaN")).parse().unwrap_err();
        assert!(matches!(err, WeatherError::InvalidParameter { ref param, .. } if param == "longitude"));

        tokio_test::assert_err!(params(Some("inf"), Some("127")).parse());
    }
}
