//! Normalized payloads produced by the upstream clients.
//!
//! Every field a provider may leave out, or fill with a sentinel, is an
//! `Option` here. Sentinels never leak through as numbers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Observed conditions on one grid cell at one base time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nowcast {
    pub datetime: DateTime<FixedOffset>,
    pub items: NowcastItems,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowcastItems {
    /// PTY code (0 none, 1 rain, 2 rain/snow, 3 snow, 5 drizzle, 6 drizzle/snow flurries, 7 snow flurries)
    pub precipitation_type: Option<i32>,
    /// Relative humidity, %
    pub humidity: Option<f64>,
    /// Precipitation over the last hour, mm
    pub rain_1h: Option<f64>,
    /// Temperature, °C
    pub temperature: Option<f64>,
    /// East-west wind component, m/s
    pub wind_u: Option<f64>,
    /// North-south wind component, m/s
    pub wind_v: Option<f64>,
    /// Wind direction, degrees
    pub wind_direction: Option<f64>,
    /// Wind speed, m/s
    pub wind_speed: Option<f64>,
}

/// Predicted conditions for one forecast instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSlot {
    pub datetime: DateTime<FixedOffset>,
    pub items: ForecastItems,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastItems {
    /// Lightning, kA
    pub lightning: Option<f64>,
    pub precipitation_type: Option<i32>,
    /// Hourly precipitation category as published, e.g. "강수없음" or "1.0mm"
    pub rain_1h: Option<String>,
    /// SKY code (1 clear, 3 mostly cloudy, 4 overcast)
    pub sky: Option<i32>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Latest particulate-matter readings from one measurement station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticulateMatter {
    /// Station-local measurement time as published ("YYYY-MM-DD HH:MM")
    pub datetime: Option<String>,
    pub station_name: String,
    pub items: PmReadings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PmReadings {
    /// PM10, µg/m³
    pub pm10_value: Option<u32>,
    /// PM2.5, µg/m³
    pub pm25_value: Option<u32>,
    /// 1-hour PM10 grade (1 good .. 4 very bad)
    pub pm10_grade: Option<u32>,
    /// 1-hour PM2.5 grade
    pub pm25_grade: Option<u32>,
}

impl ParticulateMatter {
    /// Whether at least one pollutant concentration is present.
    pub fn has_reading(&self) -> bool {
        self.items.pm10_value.is_some() || self.items.pm25_value.is_some()
    }
}

/// A measurement station near the requested location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub address: Option<String>,
    /// Distance from the query point, km
    pub distance_km: Option<f64>,
}

impl Station {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            distance_km: None,
        }
    }
}

/// Candidate stations, nearest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationCandidates(Vec<Station>);

impl StationCandidates {
    pub fn new(stations: Vec<Station>) -> Self {
        Self(stations)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Station> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.0.iter()
    }
}

impl From<Vec<Station>> for StationCandidates {
    fn from(stations: Vec<Station>) -> Self {
        Self(stations)
    }
}

/// Sunrise and sunset around the request time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunState {
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    /// Whether the request time falls between sunrise and sunset
    pub is_daytime: bool,
}
