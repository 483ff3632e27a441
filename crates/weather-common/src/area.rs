//! The geographic area the service answers for.

use crate::bbox::BoundingBox;
use crate::coord::Coordinate;
use crate::error::{WeatherError, WeatherResult};

/// Coarse rectangle covering the KMA short-range forecast domain
/// (southern Korean peninsula and Jeju).
const KOREA_BOUNDS: BoundingBox = BoundingBox::new(125.06666667, 33.10000000, 131.87222222, 38.45000000);

/// Rejects coordinates outside the supported area before any upstream call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceArea {
    bounds: BoundingBox,
}

impl ServiceArea {
    /// The default service area.
    pub const fn korea() -> Self {
        Self {
            bounds: KOREA_BOUNDS,
        }
    }

    /// Service area with custom bounds.
    pub const fn with_bounds(bounds: BoundingBox) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Check a raw latitude/longitude pair and turn it into a [`Coordinate`].
    ///
    /// Both ranges are inclusive. Non-finite input is out of bounds.
    pub fn validate(&self, latitude: f64, longitude: f64) -> WeatherResult<Coordinate> {
        if latitude.is_finite()
            && longitude.is_finite()
            && self.bounds.contains_point(longitude, latitude)
        {
            Ok(Coordinate::new(latitude, longitude))
        } else {
            Err(WeatherError::OutOfBounds {
                latitude,
                longitude,
            })
        }
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        Self::korea()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seoul_is_inside() {
        let coord = ServiceArea::korea().validate(37.5665, 126.9780).unwrap();
        assert_eq!(coord.latitude, 37.5665);
        assert_eq!(coord.longitude, 126.9780);
    }

    #[test]
    fn test_longitude_outside_is_rejected() {
        // Latitude is fine, longitude west of the box (Yellow Sea / China)
        let err = ServiceArea::korea().validate(37.0, 121.0).unwrap_err();
        assert!(matches!(err, WeatherError::OutOfBounds { .. }));

        // East of the box
        assert!(ServiceArea::korea().validate(37.0, 135.0).is_err());
    }

    #[test]
    fn test_infinite_is_rejected() {
        assert!(ServiceArea::korea().validate(f64::INFINITY, 127.0).is_err());
        assert!(ServiceArea::korea().validate(37.0, f64::NEG_INFINITY).is_err());
    }
}
