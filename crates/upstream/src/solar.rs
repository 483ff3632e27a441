//! Local sunrise/sunset computation, no network involved.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use sunrise::{Coordinates, SolarDay, SolarEvent};
use weather_common::{kst, Coordinate};

use crate::error::{UpstreamError, UpstreamResult};
use crate::sources::SunCalculator;
use crate::types::SunState;

/// Computes solar events from the observer's position.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSunCalculator;

impl LocalSunCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Sun state at `now`.
    ///
    /// Looks at the events of the observer's KST date and the day before:
    /// it is daytime when the latest sunrise at or before `now` comes after
    /// the latest sunset at or before `now`.
    pub fn compute(&self, coord: &Coordinate, now: DateTime<FixedOffset>) -> UpstreamResult<SunState> {
        let observer = Coordinates::new(coord.latitude, coord.longitude).ok_or_else(|| {
            UpstreamError::Malformed(format!(
                "invalid observer position {}, {}",
                coord.latitude, coord.longitude
            ))
        })?;

        let now = now.with_timezone(&kst());
        let today = now.date_naive();
        let yesterday = today - Duration::days(1);

        let (sunrise, sunset) = events(observer, today);
        let (prev_sunrise, prev_sunset) = events(observer, yesterday);

        let latest = |a: DateTime<FixedOffset>, b: DateTime<FixedOffset>| {
            [a, b].into_iter().filter(|t| *t <= now).max()
        };

        let is_daytime = match (latest(sunrise, prev_sunrise), latest(sunset, prev_sunset)) {
            (Some(rise), Some(set)) => rise > set,
            (Some(_), None) => true,
            _ => false,
        };

        Ok(SunState {
            sunrise,
            sunset,
            is_daytime,
        })
    }
}

fn events(observer: Coordinates, date: NaiveDate) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let day = SolarDay::new(observer, date);
    (
        day.event_time(SolarEvent::Sunrise).with_timezone(&kst()),
        day.event_time(SolarEvent::Sunset).with_timezone(&kst()),
    )
}

#[async_trait]
impl SunCalculator for LocalSunCalculator {
    async fn sun_state(&self, coord: &Coordinate, now: DateTime<FixedOffset>) -> UpstreamResult<SunState> {
        self.compute(coord, now)
    }
}
