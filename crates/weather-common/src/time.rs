//! Publish-schedule handling for the KMA short-range feeds.
//!
//! The KMA feeds publish once an hour on a fixed tick and only become
//! available some minutes after the tick. Requesting a tick that is not yet
//! published returns an error or stale data, so the request time has to be
//! rolled back to the newest tick that is already out.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Korea Standard Time (UTC+9, no daylight saving).
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("UTC+9 is a valid fixed offset")
}

/// Current wall-clock time in KST.
pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

/// Nowcast (ultra short-range observation): ticks at HH:00, out by HH:10.
pub const NOWCAST_SCHEDULE: PublishSchedule = PublishSchedule::new(0, 10);

/// Forecast (ultra short-range forecast): ticks at HH:30, out by HH:45.
pub const FORECAST_SCHEDULE: PublishSchedule = PublishSchedule::new(30, 15);

/// Hourly publish cadence of one upstream feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSchedule {
    /// Minute past the hour of each nominal publish tick.
    pub tick_minute: u32,
    /// Minutes after the tick before the data is available.
    pub available_after_minutes: i64,
}

impl PublishSchedule {
    pub const fn new(tick_minute: u32, available_after_minutes: i64) -> Self {
        Self {
            tick_minute,
            available_after_minutes,
        }
    }

    /// Newest published base time at `now`.
    ///
    /// Takes the latest tick at or before `now` (in KST). If that tick is
    /// still inside its availability window, steps back one hour. Date
    /// changes follow from the arithmetic, so 00:05 yields 23:00 of the
    /// previous day for the nowcast feed.
    pub fn base_time_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> BaseTime {
        let local = now.with_timezone(&kst()).naive_local();

        let minutes_since_tick = (i64::from(local.minute()) - i64::from(self.tick_minute)).rem_euclid(60);
        let tick = local
            - Duration::minutes(minutes_since_tick)
            - Duration::seconds(i64::from(local.second()))
            - Duration::nanoseconds(i64::from(local.nanosecond()));

        let base = if local - tick < Duration::minutes(self.available_after_minutes) {
            tick - Duration::hours(1)
        } else {
            tick
        };

        BaseTime(base)
    }
}

/// A publish tick in KST, as requested from the KMA feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BaseTime(NaiveDateTime);

impl BaseTime {
    pub fn from_naive(local: NaiveDateTime) -> Self {
        Self(local)
    }

    /// `base_date` query value (`YYYYMMDD`).
    pub fn date_param(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// `base_time` query value (`HHMM`).
    pub fn time_param(&self) -> String {
        self.0.format("%H%M").to_string()
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn to_kst(&self) -> DateTime<FixedOffset> {
        DateTime::from_naive_utc_and_offset(self.0 - Duration::seconds(i64::from(KST_OFFSET_SECS)), kst())
    }
}
