//! Application state for the weather API.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};
use upstream::{
    AirKoreaClient, KasiClient, KmaClient, LocalSunCalculator, NominatimClient, SunCalculator,
    UpstreamHttp,
};

use crate::access::AccessGuard;
use crate::aggregator::{Aggregator, UpstreamSet};
use crate::config::{AppConfig, AstronomyProvider};

/// Shared application state.
pub struct AppState {
    pub aggregator: Aggregator,
    pub access: AccessGuard,
    /// Handle for rendering `/metrics`; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, access: AccessGuard, prometheus: Option<PrometheusHandle>) -> Self {
        Self {
            aggregator,
            access,
            prometheus,
        }
    }

    /// Wire the real upstream clients from configuration.
    pub fn from_config(
        config: &AppConfig,
        service_key: Option<String>,
        prometheus: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let upstreams = &config.upstreams;
        let http = UpstreamHttp::new(&upstreams.http_config()).context("Failed to build HTTP client")?;

        let service_key = service_key.unwrap_or_else(|| {
            warn!("No data.go.kr service key configured; KMA and AirKorea calls will fail");
            String::new()
        });

        let kma = Arc::new(KmaClient::new(
            http.clone(),
            &upstreams.kma_base_url,
            service_key.clone(),
        ));
        let airkorea = Arc::new(AirKoreaClient::new(
            http.clone(),
            &upstreams.airkorea_station_url,
            &upstreams.airkorea_measurement_url,
            service_key.clone(),
        ));
        let sun: Arc<dyn SunCalculator> = match upstreams.astronomy.provider {
            AstronomyProvider::Local => Arc::new(LocalSunCalculator::new()),
            AstronomyProvider::Kasi => Arc::new(KasiClient::new(http.clone(), &upstreams.kasi_url, service_key)),
        };

        let set = UpstreamSet {
            geocoder: Arc::new(NominatimClient::new(http, &upstreams.nominatim_url)),
            sun,
            nowcast: kma.clone(),
            forecast: kma,
            stations: airkorea.clone(),
            measurements: airkorea,
        };

        info!(
            timeout_secs = upstreams.timeout_secs,
            astronomy = ?upstreams.astronomy.provider,
            "Upstream clients ready"
        );

        Ok(Self::new(
            Aggregator::new(set, upstreams.timeout()),
            AccessGuard::from_config(&config.access)?,
            prometheus,
        ))
    }
}
