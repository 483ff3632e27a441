//! Reverse geocoding through a Nominatim (OpenStreetMap) server.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use weather_common::Coordinate;

use crate::error::{UpstreamError, UpstreamResult};
use crate::http::UpstreamHttp;
use crate::sources::Geocoder;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Address fields tried, in order, for the district part.
const DISTRICT_FIELDS: [&str; 5] = ["borough", "city_district", "county", "city", "town"];

/// Address fields tried, in order, for the street/village part.
const LOCALITY_FIELDS: [&str; 5] = ["road", "village", "quarter", "suburb", "neighbourhood"];

#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    pub error: Option<String>,
    #[serde(default)]
    pub address: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: UpstreamHttp,
    base_url: String,
}

impl NominatimClient {
    pub fn new(http: UpstreamHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(skip(self), fields(lat = coord.latitude, lon = coord.longitude))]
    async fn reverse(&self, coord: &Coordinate) -> UpstreamResult<String> {
        let query = [
            ("format", "json".to_string()),
            ("lat", coord.latitude.to_string()),
            ("lon", coord.longitude.to_string()),
            ("zoom", "18".to_string()),
            ("accept-language", "ko".to_string()),
        ];
        let text = self.http.get_text(&self.base_url, &query).await?;
        let response: ReverseResponse = serde_json::from_str(&text)?;
        short_address(&response)
    }
}

/// "<district> <locality>", each the most specific field available.
pub fn short_address(response: &ReverseResponse) -> UpstreamResult<String> {
    if let Some(error) = &response.error {
        return Err(UpstreamError::protocol("nominatim", error.as_str()));
    }

    let pick = |fields: &[&str]| {
        fields
            .iter()
            .filter_map(|f| response.address.get(*f))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    };

    let parts: Vec<&str> = [pick(&DISTRICT_FIELDS), pick(&LOCALITY_FIELDS)]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        return Err(UpstreamError::EmptyResult("no usable address fields".to_string()));
    }
    Ok(parts.join(" "))
}
