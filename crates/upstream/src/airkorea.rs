//! AirKorea (Korea Environment Corporation) air-quality services.
//!
//! - `MsrstnInfoInqireSvc/getNearbyMsrstnList`: stations near a TM point
//! - `ArpltnInforInqireSvc/getMsrstnAcctoRltmMesureDnsty`: latest readings of one station

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use weather_common::TmCoordinate;

use crate::data_go_kr;
use crate::error::{UpstreamError, UpstreamResult};
use crate::http::UpstreamHttp;
use crate::sources::{MeasurementSource, StationLocator};
use crate::types::{ParticulateMatter, PmReadings, Station, StationCandidates};

pub const DEFAULT_STATION_URL: &str =
    "http://apis.data.go.kr/B552584/MsrstnInfoInqireSvc/getNearbyMsrstnList";
pub const DEFAULT_MEASUREMENT_URL: &str =
    "http://apis.data.go.kr/B552584/ArpltnInforInqireSvc/getMsrstnAcctoRltmMesureDnsty";

/// Number of nearby stations kept as fallback candidates.
pub const MAX_CANDIDATES: usize = 3;

#[derive(Debug, Deserialize)]
struct Body<I> {
    #[serde(default = "Vec::new")]
    items: Vec<I>,
}

/// One `getNearbyMsrstnList` row.
#[derive(Debug, Clone, Deserialize)]
pub struct StationRow {
    #[serde(rename = "stationName")]
    pub station_name: Option<String>,
    pub addr: Option<String>,
    /// Distance from the query point in km
    pub tm: Option<Value>,
}

/// One `getMsrstnAcctoRltmMesureDnsty` row.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementRow {
    #[serde(rename = "dataTime")]
    pub data_time: Option<String>,
    #[serde(rename = "pm10Value")]
    pub pm10_value: Option<Value>,
    #[serde(rename = "pm25Value")]
    pub pm25_value: Option<Value>,
    #[serde(rename = "pm10Grade1h")]
    pub pm10_grade: Option<Value>,
    #[serde(rename = "pm25Grade1h")]
    pub pm25_grade: Option<Value>,
}

/// Client for both AirKorea operations.
#[derive(Debug, Clone)]
pub struct AirKoreaClient {
    http: UpstreamHttp,
    station_url: String,
    measurement_url: String,
    service_key: String,
}

impl AirKoreaClient {
    pub fn new(
        http: UpstreamHttp,
        station_url: impl Into<String>,
        measurement_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            station_url: station_url.into(),
            measurement_url: measurement_url.into(),
            service_key: service_key.into(),
        }
    }

    /// Nearby stations, failing on any upstream problem.
    pub async fn fetch_nearby_stations(&self, tm: TmCoordinate) -> UpstreamResult<StationCandidates> {
        let query = [
            ("serviceKey", self.service_key.clone()),
            ("returnType", "json".to_string()),
            ("tmX", format!("{:.6}", tm.x)),
            ("tmY", format!("{:.6}", tm.y)),
            ("ver", "1.1".to_string()),
        ];
        let text = self.http.get_text(&self.station_url, &query).await?;
        let body: Body<StationRow> = data_go_kr::parse_json(&text)?;
        Ok(normalize_stations(&body.items))
    }
}

#[async_trait]
impl StationLocator for AirKoreaClient {
    #[instrument(skip(self), fields(tm_x = tm.x, tm_y = tm.y))]
    async fn nearby_stations(&self, tm: TmCoordinate) -> StationCandidates {
        match self.fetch_nearby_stations(tm).await {
            Ok(stations) => {
                debug!(count = stations.len(), "Nearby stations");
                stations
            }
            Err(e) => {
                warn!(error = %e, "Station lookup failed");
                StationCandidates::empty()
            }
        }
    }
}

#[async_trait]
impl MeasurementSource for AirKoreaClient {
    #[instrument(skip(self))]
    async fn measurement(&self, station_name: &str) -> UpstreamResult<ParticulateMatter> {
        let query = [
            ("serviceKey", self.service_key.clone()),
            ("returnType", "json".to_string()),
            ("numOfRows", "1".to_string()),
            ("pageNo", "1".to_string()),
            ("stationName", station_name.to_string()),
            ("dataTerm", "DAILY".to_string()),
            ("ver", "1.4".to_string()),
        ];
        let text = self.http.get_text(&self.measurement_url, &query).await?;
        let body: Body<MeasurementRow> = data_go_kr::parse_json(&text)?;
        normalize_measurement(station_name, &body.items)
    }
}

/// Keep the first stations with a name, in provider order.
pub fn normalize_stations(rows: &[StationRow]) -> StationCandidates {
    rows.iter()
        .filter_map(|row| {
            let name = row.station_name.as_deref()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Station {
                name: name.to_string(),
                address: row.addr.clone(),
                distance_km: row.tm.as_ref().and_then(number),
            })
        })
        .take(MAX_CANDIDATES)
        .collect::<Vec<_>>()
        .into()
}

/// Latest reading of a station. All-absent readings are still `Ok`; the
/// caller decides whether that is usable.
pub fn normalize_measurement(station_name: &str, rows: &[MeasurementRow]) -> UpstreamResult<ParticulateMatter> {
    let row = rows
        .first()
        .ok_or_else(|| UpstreamError::EmptyResult(format!("no measurements for station '{}'", station_name)))?;

    Ok(ParticulateMatter {
        datetime: row.data_time.clone(),
        station_name: station_name.to_string(),
        items: PmReadings {
            pm10_value: reading(&row.pm10_value),
            pm25_value: reading(&row.pm25_value),
            pm10_grade: reading(&row.pm10_grade),
            pm25_grade: reading(&row.pm25_grade),
        },
    })
}

/// A reading, with "-", blanks and anything non-numeric treated as absent.
fn reading(value: &Option<Value>) -> Option<u32> {
    match value.as_ref()? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
