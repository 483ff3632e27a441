//! KMA short-range forecast service (`VilageFcstInfoService_2.0`).
//!
//! Two operations are used, both keyed by grid cell and base time:
//! - `getUltraSrtNcst`: observed conditions (nowcast)
//! - `getUltraSrtFcst`: six-hour forecast in hourly slots

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use weather_common::{kst, BaseTime, GridCell};

use crate::data_go_kr;
use crate::error::{UpstreamError, UpstreamResult};
use crate::http::UpstreamHttp;
use crate::sources::{ForecastSource, NowcastSource};
use crate::types::{ForecastItems, ForecastSlot, Nowcast, NowcastItems};

pub const DEFAULT_BASE_URL: &str = "http://apis.data.go.kr/1360000/VilageFcstInfoService_2.0";

const NOWCAST_OPERATION: &str = "getUltraSrtNcst";
const FORECAST_OPERATION: &str = "getUltraSrtFcst";

/// Eight nowcast categories, one row each.
const NOWCAST_ROWS: u32 = 30;
/// Ten forecast categories for six hours.
const FORECAST_ROWS: u32 = 60;

/// Magnitudes at or above this are KMA missing-value markers (+900, -999).
const MISSING_THRESHOLD: f64 = 900.0;

#[derive(Debug, Deserialize)]
struct Body<I> {
    items: Items<I>,
}

#[derive(Debug, Deserialize)]
struct Items<I> {
    #[serde(default = "Vec::new")]
    item: Vec<I>,
}

/// One `getUltraSrtNcst` row.
#[derive(Debug, Clone, Deserialize)]
pub struct NowcastRow {
    pub category: String,
    #[serde(rename = "obsrValue")]
    pub obsr_value: Value,
}

/// One `getUltraSrtFcst` row.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRow {
    pub category: String,
    #[serde(rename = "fcstDate")]
    pub fcst_date: Value,
    #[serde(rename = "fcstTime")]
    pub fcst_time: Value,
    #[serde(rename = "fcstValue")]
    pub fcst_value: Value,
}

/// Client for both KMA operations.
#[derive(Debug, Clone)]
pub struct KmaClient {
    http: UpstreamHttp,
    base_url: String,
    service_key: String,
}

impl KmaClient {
    pub fn new(http: UpstreamHttp, base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn query(&self, cell: GridCell, base: BaseTime, rows: u32) -> Vec<(&'static str, String)> {
        vec![
            ("serviceKey", self.service_key.clone()),
            ("pageNo", "1".to_string()),
            ("numOfRows", rows.to_string()),
            ("dataType", "JSON".to_string()),
            ("base_date", base.date_param()),
            ("base_time", base.time_param()),
            ("nx", cell.x.to_string()),
            ("ny", cell.y.to_string()),
        ]
    }

    async fn fetch_rows<I: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: Vec<(&'static str, String)>,
    ) -> UpstreamResult<Vec<I>> {
        let url = format!("{}/{}", self.base_url, operation);
        let text = self.http.get_text(&url, &query).await?;
        let body: Body<I> = data_go_kr::parse_json(&text)?;
        Ok(body.items.item)
    }
}

#[async_trait]
impl NowcastSource for KmaClient {
    #[instrument(skip(self), fields(nx = cell.x, ny = cell.y, base = %base.time_param()))]
    async fn nowcast(&self, cell: GridCell, base: BaseTime) -> UpstreamResult<Nowcast> {
        let rows: Vec<NowcastRow> = self
            .fetch_rows(NOWCAST_OPERATION, self.query(cell, base, NOWCAST_ROWS))
            .await?;
        debug!(rows = rows.len(), "Nowcast rows received");
        normalize_nowcast(base, &rows)
    }
}

#[async_trait]
impl ForecastSource for KmaClient {
    #[instrument(skip(self), fields(nx = cell.x, ny = cell.y, base = %base.time_param()))]
    async fn forecast(&self, cell: GridCell, base: BaseTime) -> UpstreamResult<Vec<ForecastSlot>> {
        let rows: Vec<ForecastRow> = self
            .fetch_rows(FORECAST_OPERATION, self.query(cell, base, FORECAST_ROWS))
            .await?;
        debug!(rows = rows.len(), "Forecast rows received");
        normalize_forecast(&rows)
    }
}

/// Fold nowcast rows into one record stamped with the base time.
pub fn normalize_nowcast(base: BaseTime, rows: &[NowcastRow]) -> UpstreamResult<Nowcast> {
    if rows.is_empty() {
        return Err(UpstreamError::EmptyResult("nowcast returned no items".to_string()));
    }

    let mut items = NowcastItems::default();
    for row in rows {
        let value = numeric(&row.obsr_value);
        match row.category.as_str() {
            "PTY" => items.precipitation_type = value.map(|v| v as i32),
            "REH" => items.humidity = value,
            "RN1" => items.rain_1h = value,
            "T1H" => items.temperature = value,
            "UUU" => items.wind_u = value,
            "VVV" => items.wind_v = value,
            "VEC" => items.wind_direction = value,
            "WSD" => items.wind_speed = value,
            _ => {}
        }
    }

    Ok(Nowcast {
        datetime: base.to_kst(),
        items,
    })
}

/// Group forecast rows by forecast instant, earliest first.
pub fn normalize_forecast(rows: &[ForecastRow]) -> UpstreamResult<Vec<ForecastSlot>> {
    if rows.is_empty() {
        return Err(UpstreamError::EmptyResult("forecast returned no items".to_string()));
    }

    let mut slots: BTreeMap<NaiveDateTime, ForecastItems> = BTreeMap::new();
    for row in rows {
        let at = forecast_instant(row)?;
        let items = slots.entry(at).or_default();
        let value = numeric(&row.fcst_value);
        match row.category.as_str() {
            "LGT" => items.lightning = value,
            "PTY" => items.precipitation_type = value.map(|v| v as i32),
            "RN1" => items.rain_1h = text(&row.fcst_value),
            "SKY" => items.sky = value.map(|v| v as i32),
            "T1H" => items.temperature = value,
            "REH" => items.humidity = value,
            "WSD" => items.wind_speed = value,
            _ => {}
        }
    }

    slots
        .into_iter()
        .map(|(at, items)| {
            Ok(ForecastSlot {
                datetime: to_kst(at)?,
                items,
            })
        })
        .collect()
}

fn forecast_instant(row: &ForecastRow) -> UpstreamResult<NaiveDateTime> {
    let date = text(&row.fcst_date).unwrap_or_default();
    let time = text(&row.fcst_time).unwrap_or_default();
    NaiveDateTime::parse_from_str(&format!("{}{:0>4}", date, time), "%Y%m%d%H%M")
        .map_err(|e| UpstreamError::Malformed(format!("bad forecast time '{} {}': {}", date, time, e)))
}

fn to_kst(local: NaiveDateTime) -> UpstreamResult<DateTime<FixedOffset>> {
    kst()
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| UpstreamError::Malformed(format!("unrepresentable time {}", local)))
}

/// Field value as text, whether KMA sent it as a string or a number.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Field value as a number, with missing-value markers removed.
fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (v.is_finite() && v.abs() < MISSING_THRESHOLD).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn base() -> BaseTime {
        BaseTime::from_naive(
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
        )
    }

    fn ncst(category: &str, value: Value) -> NowcastRow {
        NowcastRow {
            category: category.to_string(),
            obsr_value: value,
        }
    }

    fn fcst(category: &str, time: &str, value: &str) -> ForecastRow {
        ForecastRow {
            category: category.to_string(),
            fcst_date: json!("20240115"),
            fcst_time: json!(time),
            fcst_value: json!(value),
        }
    }

    #[test]
    fn test_nowcast_categories() {
        let rows = vec![
            ncst("PTY", json!("0")),
            ncst("REH", json!("45")),
            ncst("RN1", json!("0")),
            ncst("T1H", json!("-3.2")),
            ncst("UUU", json!("1.5")),
            ncst("VVV", json!("-0.8")),
            ncst("VEC", json!("299")),
            ncst("WSD", json!("1.7")),
        ];
        let nowcast = normalize_nowcast(base(), &rows).unwrap();
        assert_eq!(nowcast.datetime.to_rfc3339(), "2024-01-15T14:00:00+09:00");
        assert_eq!(nowcast.items.precipitation_type, Some(0));
        assert_eq!(nowcast.items.humidity, Some(45.0));
        assert_eq!(nowcast.items.temperature, Some(-3.2));
        assert_eq!(nowcast.items.wind_v, Some(-0.8));
        assert_eq!(nowcast.items.wind_direction, Some(299.0));
        assert_eq!(nowcast.items.wind_speed, Some(1.7));
    }

    #[test]
    fn test_nowcast_missing_markers_and_numbers() {
        let rows = vec![
            ncst("T1H", json!("-999")),
            ncst("REH", json!(900)),
            ncst("WSD", json!(2.5)),
            ncst("RN1", json!("강수없음")),
        ];
        let nowcast = normalize_nowcast(base(), &rows).unwrap();
        assert_eq!(nowcast.items.temperature, None);
        assert_eq!(nowcast.items.humidity, None);
        assert_eq!(nowcast.items.wind_speed, Some(2.5));
        assert_eq!(nowcast.items.rain_1h, None);
        assert_eq!(nowcast.items.wind_u, None);
    }

    #[test]
    fn test_nowcast_empty_is_empty_result() {
        let err = normalize_nowcast(base(), &[]).unwrap_err();
        assert!(matches!(err, UpstreamError::EmptyResult(_)));
    }

    #[test]
    fn test_forecast_grouped_by_time() {
        let rows = vec![
            fcst("T1H", "1600", "2"),
            fcst("T1H", "1500", "1"),
            fcst("SKY", "1500", "4"),
            fcst("RN1", "1500", "강수없음"),
            fcst("RN1", "1600", "1.0mm"),
            fcst("LGT", "1600", "0"),
            fcst("UUU", "1600", "0.3"),
        ];
        let slots = normalize_forecast(&rows).unwrap();
        assert_eq!(slots.len(), 2);

        assert_eq!(slots[0].datetime.to_rfc3339(), "2024-01-15T15:00:00+09:00");
        assert_eq!(slots[0].items.temperature, Some(1.0));
        assert_eq!(slots[0].items.sky, Some(4));
        assert_eq!(slots[0].items.rain_1h.as_deref(), Some("강수없음"));

        assert_eq!(slots[1].datetime.to_rfc3339(), "2024-01-15T16:00:00+09:00");
        assert_eq!(slots[1].items.temperature, Some(2.0));
        assert_eq!(slots[1].items.rain_1h.as_deref(), Some("1.0mm"));
        assert_eq!(slots[1].items.lightning, Some(0.0));
    }

    #[test]
    fn test_forecast_crosses_midnight_in_order() {
        let rows = vec![
            ForecastRow {
                category: "T1H".into(),
                fcst_date: json!("20240116"),
                fcst_time: json!("0000"),
                fcst_value: json!("-5"),
            },
            ForecastRow {
                category: "T1H".into(),
                fcst_date: json!("20240115"),
                fcst_time: json!("2300"),
                fcst_value: json!("-4"),
            },
        ];
        let slots = normalize_forecast(&rows).unwrap();
        assert_eq!(slots[0].datetime.to_rfc3339(), "2024-01-15T23:00:00+09:00");
        assert_eq!(slots[1].datetime.to_rfc3339(), "2024-01-16T00:00:00+09:00");
    }

    #[test]
    fn test_forecast_bad_time_is_malformed() {
        let rows = vec![fcst("T1H", "9999", "1")];
        let err = normalize_forecast(&rows).unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }
}
