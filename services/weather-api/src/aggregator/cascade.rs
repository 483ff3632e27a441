//! Nearest-station fallback for particulate-matter readings.

use std::future::Future;

use tracing::debug;
use upstream::{ParticulateMatter, StationCandidates, UpstreamError, UpstreamResult};

/// Stations tried before giving up.
pub const MAX_STATION_ATTEMPTS: usize = 3;

/// Query candidates nearest-first until one has a pollutant reading.
///
/// A station counts as usable when at least one of PM10 and PM2.5 is
/// present; errors and all-absent readings both move on to the next
/// candidate. When the candidates run out, the last attempt's result is
/// returned as is. Returns the result and the 1-based number of stations
/// tried (0 for an empty list).
pub async fn first_usable<F, Fut>(
    candidates: &StationCandidates,
    mut measure: F,
) -> (UpstreamResult<ParticulateMatter>, usize)
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = UpstreamResult<ParticulateMatter>>,
{
    let mut last = Err(UpstreamError::EmptyResult(
        "no measurement station nearby".to_string(),
    ));
    let mut attempts = 0;

    for station in candidates.iter().take(MAX_STATION_ATTEMPTS) {
        attempts += 1;
        let result = measure(station.name.clone()).await;

        match &result {
            Ok(pm) if pm.has_reading() => {
                debug!(station = %station.name, attempts, "Station has readings");
                return (result, attempts);
            }
            Ok(_) => debug!(station = %station.name, attempts, "Station has no readings, trying next"),
            Err(e) => debug!(station = %station.name, attempts, error = %e, "Station failed, trying next"),
        }
        last = result;
    }

    (last, attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use upstream::{PmReadings, Station};

    fn candidates(names: &[&str]) -> StationCandidates {
        names.iter().map(|n| Station::named(*n)).collect::<Vec<_>>().into()
    }

    fn pm(station: &str, pm10: Option<u32>) -> UpstreamResult<ParticulateMatter> {
        Ok(ParticulateMatter {
            datetime: None,
            station_name: station.to_string(),
            items: PmReadings {
                pm10_value: pm10,
                ..PmReadings::default()
            },
        })
    }

    #[tokio::test]
    async fn test_first_station_usable() {
        let calls = Mutex::new(Vec::new());
        let (result, attempts) = first_usable(&candidates(&["a", "b", "c"]), |name| {
            calls.lock().unwrap().push(name.clone());
            async move { pm(&name, Some(20)) }
        })
        .await;

        assert_eq!(attempts, 1);
        assert_eq!(result.unwrap().station_name, "a");
        assert_eq!(*calls.lock().unwrap(), ["a"]);
    }

    #[tokio::test]
    async fn test_falls_through_nulls_to_third() {
        let (result, attempts) = first_usable(&candidates(&["a", "b", "c"]), |name| async move {
            match name.as_str() {
                "c" => pm(&name, Some(42)),
                _ => pm(&name, None),
            }
        })
        .await;

        assert_eq!(attempts, 3);
        let pm = result.unwrap();
        assert_eq!(pm.station_name, "c");
        assert_eq!(pm.items.pm10_value, Some(42));
    }

    #[tokio::test]
    async fn test_error_then_success() {
        let (result, attempts) = first_usable(&candidates(&["a", "b"]), |name| async move {
            match name.as_str() {
                "a" => Err(UpstreamError::Transport("reset".to_string())),
                _ => pm(&name, Some(7)),
            }
        })
        .await;

        assert_eq!(attempts, 2);
        assert_eq!(result.unwrap().station_name, "b");
    }

    #[tokio::test]
    async fn test_exhausted_returns_last_attempt() {
        // Last attempt failed: failure is reported
        let (result, attempts) = first_usable(&candidates(&["a", "b", "c"]), |name| async move {
            match name.as_str() {
                "c" => Err(UpstreamError::protocol("03", "NO_DATA")),
                _ => pm(&name, None),
            }
        })
        .await;
        assert_eq!(attempts, 3);
        assert_eq!(result.unwrap_err(), UpstreamError::protocol("03", "NO_DATA"));

        // Last attempt answered without readings: that answer is reported
        let (result, attempts) = first_usable(&candidates(&["a", "b"]), |name| async move {
            match name.as_str() {
                "a" => Err(UpstreamError::Transport("reset".to_string())),
                _ => pm(&name, None),
            }
        })
        .await;
        assert_eq!(attempts, 2);
        let pm = result.unwrap();
        assert_eq!(pm.station_name, "b");
        assert!(!pm.has_reading());
    }

    #[tokio::test]
    async fn test_never_more_than_three() {
        let calls = Mutex::new(0);
        let (result, attempts) = first_usable(&candidates(&["a", "b", "c", "d", "e"]), |name| {
            *calls.lock().unwrap() += 1;
            async move { pm(&name, None) }
        })
        .await;

        assert_eq!(attempts, MAX_STATION_ATTEMPTS);
        assert_eq!(*calls.lock().unwrap(), 3);
        assert_eq!(result.unwrap().station_name, "c");
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let (result, attempts) =
            first_usable(&StationCandidates::empty(), |name| async move { pm(&name, Some(1)) }).await;

        assert_eq!(attempts, 0);
        assert!(matches!(result, Err(UpstreamError::EmptyResult(_))));
    }
}
