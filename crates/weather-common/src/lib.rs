//! Common types and utilities shared across the weather aggregation crates.

pub mod area;
pub mod bbox;
pub mod coord;
pub mod error;
pub mod time;

pub use area::ServiceArea;
pub use bbox::BoundingBox;
pub use coord::{Coordinate, GridCell, TmCoordinate};
pub use error::{WeatherError, WeatherResult};
pub use time::{kst, now_kst, BaseTime, PublishSchedule, FORECAST_SCHEDULE, NOWCAST_SCHEDULE};
