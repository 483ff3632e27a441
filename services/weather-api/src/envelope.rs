//! Response model: one outcome per data category plus request totals.

use std::time::Duration;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use upstream::{ForecastSlot, Nowcast, ParticulateMatter, SunState, UpstreamError, UpstreamResult};

/// The data categories a weather request fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Address,
    Sun,
    Nowcast,
    Forecast,
    ParticulateMatter,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Address => "address",
            SourceKind::Sun => "sun",
            SourceKind::Nowcast => "nowcast",
            SourceKind::Forecast => "forecast",
            SourceKind::ParticulateMatter => "particulate_matter",
        }
    }
}

/// What one upstream contributed to a response.
#[derive(Debug, Clone)]
pub struct SourceOutcome<T> {
    pub kind: SourceKind,
    pub result: UpstreamResult<T>,
    pub elapsed: Duration,
}

impl<T> SourceOutcome<T> {
    pub fn new(kind: SourceKind, result: UpstreamResult<T>, elapsed: Duration) -> Self {
        Self {
            kind,
            result,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn data(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&UpstreamError> {
        self.result.as_ref().err()
    }
}

impl<T: Serialize> Serialize for SourceOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SourceOutcome", 5)?;
        s.serialize_field("type", &self.kind)?;
        s.serialize_field("success", &self.is_success())?;
        s.serialize_field("messages", &self.error().map(|e| e.to_string()))?;
        s.serialize_field("processing_time", &self.elapsed.as_secs_f64())?;
        s.serialize_field("data", &self.data())?;
        s.end()
    }
}

/// Everything returned for one coordinate.
///
/// Assembled once, after every branch of the fan-out has finished.
#[derive(Debug, Clone)]
pub struct WeatherEnvelope {
    pub address: SourceOutcome<String>,
    pub sun: SourceOutcome<SunState>,
    pub nowcast: SourceOutcome<Nowcast>,
    pub forecast: SourceOutcome<Vec<ForecastSlot>>,
    pub particulate_matter: SourceOutcome<ParticulateMatter>,
    /// Measurement stations tried for the particulate-matter outcome
    pub pm_attempts: usize,
    pub processing_time: Duration,
}

impl WeatherEnvelope {
    pub fn address(&self) -> Option<&str> {
        self.address.data().map(String::as_str)
    }

    /// Daylight at request time; `false` when the sun source failed.
    pub fn is_sunrise(&self) -> bool {
        self.sun.data().map(|s| s.is_daytime).unwrap_or(false)
    }
}

#[derive(Serialize)]
struct WireEnvelope<'a> {
    address: Option<&'a str>,
    is_sunrise: bool,
    nowcast: &'a SourceOutcome<Nowcast>,
    forecast: &'a SourceOutcome<Vec<ForecastSlot>>,
    particulate_matter: &'a SourceOutcome<ParticulateMatter>,
    pm_count: usize,
    process_time: f64,
}

impl Serialize for WeatherEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireEnvelope {
            address: self.address(),
            is_sunrise: self.is_sunrise(),
            nowcast: &self.nowcast,
            forecast: &self.forecast,
            particulate_matter: &self.particulate_matter,
            pm_count: self.pm_attempts,
            process_time: self.processing_time.as_secs_f64(),
        }
        .serialize(serializer)
    }
}
