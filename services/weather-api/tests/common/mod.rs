//! In-process test doubles for every upstream capability.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use upstream::{
    ForecastItems, ForecastSlot, ForecastSource, Geocoder, MeasurementSource, Nowcast, NowcastItems,
    NowcastSource, ParticulateMatter, PmReadings, Station, StationCandidates, StationLocator,
    SunCalculator, SunState, UpstreamError, UpstreamResult,
};
use weather_api::aggregator::{Aggregator, UpstreamSet};
use weather_common::{kst, BaseTime, Coordinate, GridCell, TmCoordinate};

/// 2024-01-15 14:05 KST, a weekday afternoon.
pub fn request_time() -> DateTime<FixedOffset> {
    kst().with_ymd_and_hms(2024, 1, 15, 14, 5, 0).unwrap()
}

/// Scripted upstream: always answers `result` after `delay`.
pub struct Mock<T> {
    result: UpstreamResult<T>,
    delay: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl<T: Clone> Mock<T> {
    pub fn ok(value: T) -> Self {
        Self::with_result(Ok(value))
    }

    pub fn err(error: UpstreamError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: UpstreamResult<T>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Arguments of every call, rendered as text.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    async fn answer(&self, args: String) -> UpstreamResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(args);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

#[async_trait]
impl Geocoder for Mock<String> {
    async fn reverse(&self, coord: &Coordinate) -> UpstreamResult<String> {
        self.answer(format!("{},{}", coord.latitude, coord.longitude)).await
    }
}

#[async_trait]
impl SunCalculator for Mock<SunState> {
    async fn sun_state(&self, coord: &Coordinate, now: DateTime<FixedOffset>) -> UpstreamResult<SunState> {
        self.answer(format!("{},{} {}", coord.latitude, coord.longitude, now.to_rfc3339()))
            .await
    }
}

#[async_trait]
impl NowcastSource for Mock<Nowcast> {
    async fn nowcast(&self, cell: GridCell, base: BaseTime) -> UpstreamResult<Nowcast> {
        self.answer(format!("{} {} {},{}", base.date_param(), base.time_param(), cell.x, cell.y))
            .await
    }
}

#[async_trait]
impl ForecastSource for Mock<Vec<ForecastSlot>> {
    async fn forecast(&self, cell: GridCell, base: BaseTime) -> UpstreamResult<Vec<ForecastSlot>> {
        self.answer(format!("{} {} {},{}", base.date_param(), base.time_param(), cell.x, cell.y))
            .await
    }
}

#[async_trait]
impl StationLocator for Mock<StationCandidates> {
    async fn nearby_stations(&self, tm: TmCoordinate) -> StationCandidates {
        self.answer(format!("{:.0},{:.0}", tm.x, tm.y))
            .await
            .unwrap_or_default()
    }
}

/// Measurement source answering per station name.
pub struct MockMeasurements {
    by_station: HashMap<String, UpstreamResult<ParticulateMatter>>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl MockMeasurements {
    pub fn new() -> Self {
        Self {
            by_station: HashMap::new(),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn station(mut self, name: &str, result: UpstreamResult<ParticulateMatter>) -> Self {
        self.by_station.insert(name.to_string(), result);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Station names queried, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MeasurementSource for MockMeasurements {
    async fn measurement(&self, station_name: &str) -> UpstreamResult<ParticulateMatter> {
        self.calls.lock().unwrap().push(station_name.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.by_station
            .get(station_name)
            .cloned()
            .unwrap_or_else(|| Err(UpstreamError::protocol("03", "NO_DATA")))
    }
}

pub fn sun_state(is_daytime: bool) -> SunState {
    SunState {
        sunrise: kst().with_ymd_and_hms(2024, 1, 15, 7, 46, 0).unwrap(),
        sunset: kst().with_ymd_and_hms(2024, 1, 15, 17, 34, 0).unwrap(),
        is_daytime,
    }
}

pub fn nowcast() -> Nowcast {
    Nowcast {
        datetime: kst().with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap(),
        items: NowcastItems {
            precipitation_type: Some(0),
            humidity: Some(45.0),
            temperature: Some(-1.5),
            wind_speed: Some(2.1),
            ..NowcastItems::default()
        },
    }
}

pub fn forecast() -> Vec<ForecastSlot> {
    (14..17)
        .map(|hour| ForecastSlot {
            datetime: kst().with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap(),
            items: ForecastItems {
                sky: Some(1),
                precipitation_type: Some(0),
                rain_1h: Some("강수없음".to_string()),
                temperature: Some(-1.0),
                ..ForecastItems::default()
            },
        })
        .collect()
}

pub fn pm(station: &str, pm10: Option<u32>, pm25: Option<u32>) -> UpstreamResult<ParticulateMatter> {
    Ok(ParticulateMatter {
        datetime: Some("2024-01-15 14:00".to_string()),
        station_name: station.to_string(),
        items: PmReadings {
            pm10_value: pm10,
            pm25_value: pm25,
            ..PmReadings::default()
        },
    })
}

pub fn candidates(names: &[&str]) -> StationCandidates {
    names.iter().map(|n| Station::named(*n)).collect::<Vec<_>>().into()
}

/// One double per capability, kept so tests can inspect calls afterwards.
pub struct Mocks {
    pub geocoder: Arc<Mock<String>>,
    pub sun: Arc<Mock<SunState>>,
    pub nowcast: Arc<Mock<Nowcast>>,
    pub forecast: Arc<Mock<Vec<ForecastSlot>>>,
    pub stations: Arc<Mock<StationCandidates>>,
    pub measurements: Arc<MockMeasurements>,
}

impl Mocks {
    /// Every source answers immediately and successfully.
    pub fn healthy() -> Self {
        Self {
            geocoder: Arc::new(Mock::ok("중구 세종대로".to_string())),
            sun: Arc::new(Mock::ok(sun_state(true))),
            nowcast: Arc::new(Mock::ok(nowcast())),
            forecast: Arc::new(Mock::ok(forecast())),
            stations: Arc::new(Mock::ok(candidates(&["중구", "종로구", "용산구"]))),
            measurements: Arc::new(MockMeasurements::new().station("중구", pm("중구", Some(31), Some(12)))),
        }
    }

    pub fn upstream_set(&self) -> UpstreamSet {
        UpstreamSet {
            geocoder: self.geocoder.clone(),
            sun: self.sun.clone(),
            nowcast: self.nowcast.clone(),
            forecast: self.forecast.clone(),
            stations: self.stations.clone(),
            measurements: self.measurements.clone(),
        }
    }

    pub fn aggregator(&self, call_timeout: Duration) -> Aggregator {
        Aggregator::new(self.upstream_set(), call_timeout)
    }

    /// Calls made to any upstream.
    pub fn total_calls(&self) -> usize {
        self.geocoder.calls()
            + self.sun.calls()
            + self.nowcast.calls()
            + self.forecast.calls()
            + self.stations.calls()
            + self.measurements.calls().len()
    }
}
