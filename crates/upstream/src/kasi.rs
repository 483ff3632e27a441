//! KASI (Korea Astronomy and Space Science Institute) rise/set service.
//!
//! `RiseSetInfoService/getLCRiseSetInfo` only answers in XML. Times are
//! local (KST) `HHMM` strings, often padded with spaces.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::Deserialize;
use tracing::instrument;
use weather_common::{kst, Coordinate};

use crate::data_go_kr::{self, Header};
use crate::error::{UpstreamError, UpstreamResult};
use crate::http::UpstreamHttp;
use crate::sources::SunCalculator;
use crate::types::SunState;

pub const DEFAULT_BASE_URL: &str =
    "http://apis.data.go.kr/B090041/openapi/service/RiseSetInfoService/getLCRiseSetInfo";

#[derive(Debug, Deserialize)]
struct RiseSetResponse {
    header: Header,
    body: Option<RiseSetBody>,
}

#[derive(Debug, Deserialize)]
struct RiseSetBody {
    items: Option<RiseSetItems>,
}

#[derive(Debug, Deserialize)]
struct RiseSetItems {
    #[serde(default)]
    item: Vec<RiseSetItem>,
}

#[derive(Debug, Deserialize)]
struct RiseSetItem {
    sunrise: Option<String>,
    sunset: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KasiClient {
    http: UpstreamHttp,
    base_url: String,
    service_key: String,
}

impl KasiClient {
    pub fn new(http: UpstreamHttp, base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }
}

#[async_trait]
impl SunCalculator for KasiClient {
    #[instrument(skip(self), fields(lat = coord.latitude, lon = coord.longitude))]
    async fn sun_state(&self, coord: &Coordinate, now: DateTime<FixedOffset>) -> UpstreamResult<SunState> {
        let now = now.with_timezone(&kst());
        let date = now.date_naive();
        let query = [
            ("serviceKey", self.service_key.clone()),
            ("locdate", date.format("%Y%m%d").to_string()),
            ("latitude", coord.latitude.to_string()),
            ("longitude", coord.longitude.to_string()),
            ("dnYn", "Y".to_string()),
        ];
        let text = self.http.get_text(&self.base_url, &query).await?;
        parse_rise_set(&text, date, now)
    }
}

/// Read sunrise/sunset for `date` from a KASI answer and compare with `now`.
pub fn parse_rise_set(text: &str, date: NaiveDate, now: DateTime<FixedOffset>) -> UpstreamResult<SunState> {
    if data_go_kr::is_gateway_error(text) {
        return Err(data_go_kr::parse_gateway_error(text));
    }

    let doc: RiseSetResponse = quick_xml::de::from_str(text)?;
    doc.header.check()?;

    let item = doc
        .body
        .and_then(|b| b.items)
        .and_then(|i| i.item.into_iter().next())
        .ok_or_else(|| UpstreamError::EmptyResult("no rise/set item".to_string()))?;

    let sunrise = local_time(date, item.sunrise.as_deref(), "sunrise")?;
    let sunset = local_time(date, item.sunset.as_deref(), "sunset")?;

    Ok(SunState {
        sunrise,
        sunset,
        is_daytime: sunrise < now && now < sunset,
    })
}

fn local_time(date: NaiveDate, hhmm: Option<&str>, field: &str) -> UpstreamResult<DateTime<FixedOffset>> {
    let hhmm = hhmm.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        UpstreamError::EmptyResult(format!("{} missing", field))
    })?;
    let time = NaiveTime::parse_from_str(hhmm, "%H%M")
        .map_err(|e| UpstreamError::Malformed(format!("bad {} '{}': {}", field, hhmm, e)))?;
    kst()
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| UpstreamError::Malformed(format!("unrepresentable {}", field)))
}
