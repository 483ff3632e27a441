//! Capability traits, one per kind of upstream data.
//!
//! The orchestrator only sees these traits, so any provider (or a test
//! double) can stand behind each of them.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use weather_common::{BaseTime, Coordinate, GridCell, TmCoordinate};

use crate::error::UpstreamResult;
use crate::types::{ForecastSlot, Nowcast, ParticulateMatter, StationCandidates, SunState};

/// Reverse geocoding to a short address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, coord: &Coordinate) -> UpstreamResult<String>;
}

/// Sunrise/sunset state at a place and time.
#[async_trait]
pub trait SunCalculator: Send + Sync {
    async fn sun_state(&self, coord: &Coordinate, now: DateTime<FixedOffset>) -> UpstreamResult<SunState>;
}

/// Observed conditions on the forecast grid.
#[async_trait]
pub trait NowcastSource: Send + Sync {
    async fn nowcast(&self, cell: GridCell, base: BaseTime) -> UpstreamResult<Nowcast>;
}

/// Short-range forecast on the forecast grid, ordered by forecast time.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn forecast(&self, cell: GridCell, base: BaseTime) -> UpstreamResult<Vec<ForecastSlot>>;
}

/// Measurement stations near a TM coordinate, nearest first.
///
/// Never fails: errors are logged and reported as an empty list, which the
/// caller treats as "no station available".
#[async_trait]
pub trait StationLocator: Send + Sync {
    async fn nearby_stations(&self, tm: TmCoordinate) -> StationCandidates;
}

/// Current particulate-matter readings of one station.
#[async_trait]
pub trait MeasurementSource: Send + Sync {
    async fn measurement(&self, station_name: &str) -> UpstreamResult<ParticulateMatter>;
}
