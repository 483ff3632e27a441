//! Fan-out of one weather request to every upstream source.
//!
//! A request is validated, converted to each provider's coordinate system
//! and then sent to all sources at once. Every branch ends in its own
//! [`SourceOutcome`]; one source failing never affects the others. Once the
//! coordinate has passed the service-area check a request always produces
//! an envelope.
//!
//! Branches are joined futures inside the request future, so dropping the
//! request (client gone) drops every in-flight upstream call with it.

pub mod cascade;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use projection::CoordinateTransformer;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use upstream::{
    ForecastSource, Geocoder, MeasurementSource, NowcastSource, ParticulateMatter, StationCandidates,
    StationLocator, SunCalculator, UpstreamError, UpstreamResult,
};
use weather_common::{
    now_kst, ServiceArea, TmCoordinate, WeatherResult, FORECAST_SCHEDULE, NOWCAST_SCHEDULE,
};

use crate::envelope::{SourceKind, SourceOutcome, WeatherEnvelope};
use crate::metrics;

/// One implementation per capability.
#[derive(Clone)]
pub struct UpstreamSet {
    pub geocoder: Arc<dyn Geocoder>,
    pub sun: Arc<dyn SunCalculator>,
    pub nowcast: Arc<dyn NowcastSource>,
    pub forecast: Arc<dyn ForecastSource>,
    pub stations: Arc<dyn StationLocator>,
    pub measurements: Arc<dyn MeasurementSource>,
}

/// The aggregation orchestrator. Holds no per-request state; one instance
/// serves all requests concurrently.
pub struct Aggregator {
    area: ServiceArea,
    transformer: CoordinateTransformer,
    upstreams: UpstreamSet,
    call_timeout: Duration,
}

impl Aggregator {
    pub fn new(upstreams: UpstreamSet, call_timeout: Duration) -> Self {
        Self {
            area: ServiceArea::korea(),
            transformer: CoordinateTransformer::default(),
            upstreams,
            call_timeout,
        }
    }

    pub fn with_area(mut self, area: ServiceArea) -> Self {
        self.area = area;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Weather for a coordinate, as of now.
    pub async fn get_weather(&self, latitude: f64, longitude: f64) -> WeatherResult<WeatherEnvelope> {
        self.get_weather_at(latitude, longitude, now_kst()).await
    }

    /// Weather for a coordinate with an explicit request time. The time
    /// drives base-time selection and the daylight check.
    #[instrument(skip(self, now))]
    pub async fn get_weather_at(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<FixedOffset>,
    ) -> WeatherResult<WeatherEnvelope> {
        let started = Instant::now();

        let coord = match self.area.validate(latitude, longitude) {
            Ok(coord) => coord,
            Err(e) => {
                info!(latitude, longitude, "Coordinates outside the service area");
                metrics::record_request("out_of_bounds", started.elapsed());
                return Err(e);
            }
        };

        let cell = self.transformer.to_grid(&coord);
        let tm = self.transformer.to_tm(&coord);
        let nowcast_base = NOWCAST_SCHEDULE.base_time_at(&now);
        let forecast_base = FORECAST_SCHEDULE.base_time_at(&now);

        debug!(
            nx = cell.x,
            ny = cell.y,
            tm_x = tm.x,
            tm_y = tm.y,
            nowcast_base = %nowcast_base.time_param(),
            forecast_base = %forecast_base.time_param(),
            "Coordinates converted"
        );

        let (address, sun, nowcast, forecast, (particulate_matter, pm_attempts)) = tokio::join!(
            self.timed(SourceKind::Address, self.upstreams.geocoder.reverse(&coord)),
            self.timed(SourceKind::Sun, self.upstreams.sun.sun_state(&coord, now)),
            self.timed(
                SourceKind::Nowcast,
                self.upstreams.nowcast.nowcast(cell, nowcast_base)
            ),
            self.timed(
                SourceKind::Forecast,
                self.upstreams.forecast.forecast(cell, forecast_base)
            ),
            self.particulate_matter(tm),
        );

        let processing_time = started.elapsed();
        metrics::record_request("ok", processing_time);
        metrics::record_station_attempts(pm_attempts);

        info!(
            elapsed_ms = processing_time.as_millis() as u64,
            pm_attempts,
            address_ok = address.is_success(),
            sun_ok = sun.is_success(),
            nowcast_ok = nowcast.is_success(),
            forecast_ok = forecast.is_success(),
            pm_ok = particulate_matter.is_success(),
            "Weather request complete"
        );

        Ok(WeatherEnvelope {
            address,
            sun,
            nowcast,
            forecast,
            particulate_matter,
            pm_attempts,
            processing_time,
        })
    }

    /// Station lookup followed by the measurement cascade, as one branch.
    async fn particulate_matter(&self, tm: TmCoordinate) -> (SourceOutcome<ParticulateMatter>, usize) {
        let started = Instant::now();

        let candidates =
            match tokio::time::timeout(self.call_timeout, self.upstreams.stations.nearby_stations(tm)).await {
                Ok(candidates) => candidates,
                Err(_) => {
                    warn!(timeout_ms = self.call_timeout.as_millis() as u64, "Station lookup timed out");
                    StationCandidates::empty()
                }
            };

        let (result, attempts) =
            cascade::first_usable(&candidates, |name| self.measure_station(name)).await;

        let elapsed = started.elapsed();
        Self::report(SourceKind::ParticulateMatter, &result, elapsed);
        (SourceOutcome::new(SourceKind::ParticulateMatter, result, elapsed), attempts)
    }

    async fn measure_station(&self, name: String) -> UpstreamResult<ParticulateMatter> {
        self.with_timeout(self.upstreams.measurements.measurement(&name)).await
    }

    /// Run one upstream call under the per-call timeout and wrap the result.
    async fn timed<T, F>(&self, kind: SourceKind, call: F) -> SourceOutcome<T>
    where
        F: Future<Output = UpstreamResult<T>>,
    {
        let started = Instant::now();
        let result = self.with_timeout(call).await;
        let elapsed = started.elapsed();
        Self::report(kind, &result, elapsed);
        SourceOutcome::new(kind, result, elapsed)
    }

    async fn with_timeout<T, F>(&self, call: F) -> UpstreamResult<T>
    where
        F: Future<Output = UpstreamResult<T>>,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .unwrap_or(Err(UpstreamError::Timeout(self.call_timeout)))
    }

    fn report<T>(kind: SourceKind, result: &UpstreamResult<T>, elapsed: Duration) {
        match result {
            Ok(_) => {
                debug!(source = kind.as_str(), elapsed_ms = elapsed.as_millis() as u64, "Source ok");
                metrics::record_upstream(kind, "ok", elapsed);
            }
            Err(e) => {
                warn!(source = kind.as_str(), error = %e, elapsed_ms = elapsed.as_millis() as u64, "Source failed");
                metrics::record_upstream(kind, e.kind().as_str(), elapsed);
            }
        }
    }
}
