//! Clients for the external data providers behind a weather request.
//!
//! Each provider module wraps exactly one upstream protocol and returns a
//! normalized payload or an [`UpstreamError`]. The orchestrator talks to
//! them through the capability traits in [`sources`].

pub mod airkorea;
pub mod data_go_kr;
pub mod error;
pub mod http;
pub mod kasi;
pub mod kma;
pub mod nominatim;
pub mod solar;
pub mod sources;
pub mod types;

pub use airkorea::AirKoreaClient;
pub use error::{ErrorKind, UpstreamError, UpstreamResult};
pub use http::{HttpConfig, UpstreamHttp};
pub use kasi::KasiClient;
pub use kma::KmaClient;
pub use nominatim::NominatimClient;
pub use solar::LocalSunCalculator;
pub use sources::{
    ForecastSource, Geocoder, MeasurementSource, NowcastSource, StationLocator, SunCalculator,
};
pub use types::{
    ForecastItems, ForecastSlot, Nowcast, NowcastItems, ParticulateMatter, PmReadings, Station,
    StationCandidates, SunState,
};
