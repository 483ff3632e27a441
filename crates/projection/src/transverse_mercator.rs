//! Transverse Mercator projection on an ellipsoid.
//!
//! Used for the Korean "TM" planar system that the air-quality station
//! locator expects (central belt: origin 38°N 127°E, scale 1.0, false
//! easting 200 km, false northing 500 km, Bessel 1841 with Korean 1985
//! datum). Forward series after Snyder, "Map Projections: A Working
//! Manual", eqs. 8-9 to 8-10.

use weather_common::{Coordinate, TmCoordinate};

use crate::ellipsoid::{DatumShift, Ellipsoid};

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    /// Shift applied to WGS84 input before projecting, when the target
    /// system is on another datum.
    pub datum: Option<DatumShift>,
    /// Meridian arc at lat0
    m0: f64,
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        datum: Option<DatumShift>,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        Self {
            ellipsoid,
            lat0,
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            datum,
            m0: meridian_arc(&ellipsoid, lat0),
        }
    }

    /// Korea central belt "TM" (Bessel, Korean 1985 datum).
    pub fn korea_central_belt() -> Self {
        Self::new(
            Ellipsoid::BESSEL_1841,
            38.0,
            127.0,
            1.0,
            200_000.0,
            500_000.0,
            Some(DatumShift::KOREAN_1985),
        )
    }

    /// Project a WGS84 coordinate to planar x (easting), y (northing) meters.
    pub fn project(&self, coord: &Coordinate) -> TmCoordinate {
        let (lat_deg, lon_deg) = match &self.datum {
            Some(shift) => shift.from_wgs84(coord.latitude, coord.longitude),
            None => (coord.latitude, coord.longitude),
        };
        let (x, y) = self.forward(lat_deg.to_radians(), lon_deg.to_radians());
        TmCoordinate::new(x, y)
    }

    /// Forward projection of a point already on this projection's datum.
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let ep2 = self.ellipsoid.ep2();

        let n = self.ellipsoid.prime_vertical_radius(lat);
        let t = lat.tan().powi(2);
        let c = ep2 * lat.cos().powi(2);
        let a = (lon - self.lon0) * lat.cos();
        let m = meridian_arc(&self.ellipsoid, lat);

        let x = self.k0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);

        let y = self.k0
            * (m - self.m0
                + n * lat.tan()
                    * (a * a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

        (x + self.false_easting, y + self.false_northing)
    }
}

/// Distance along the meridian from the equator to `lat` (radians).
fn meridian_arc(e: &Ellipsoid, lat: f64) -> f64 {
    let e2 = e.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    e.a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn without_datum() -> TransverseMercator {
        TransverseMercator::new(Ellipsoid::BESSEL_1841, 38.0, 127.0, 1.0, 200_000.0, 500_000.0, None)
    }

    #[test]
    fn test_origin_maps_to_false_origin() {
        let tm = without_datum().project(&Coordinate::new(38.0, 127.0));
        assert_approx_eq!(tm.x, 200_000.0, 1e-6);
        assert_approx_eq!(tm.y, 500_000.0, 1e-6);
    }

    #[test]
    fn test_symmetric_about_central_meridian() {
        let proj = without_datum();
        let west = proj.project(&Coordinate::new(36.0, 126.5));
        let east = proj.project(&Coordinate::new(36.0, 127.5));
        assert_approx_eq!(200_000.0 - west.x, east.x - 200_000.0, 1e-6);
        assert_approx_eq!(west.y, east.y, 1e-6);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // ~111 km per degree of latitude along the central meridian
        let proj = without_datum();
        let a = proj.project(&Coordinate::new(37.0, 127.0));
        let b = proj.project(&Coordinate::new(38.0, 127.0));
        let d = b.y - a.y;
        assert!(d > 110_000.0 && d < 112_000.0, "d = {}", d);
    }

    #[test]
    fn test_seoul_city_hall() {
        let tm = TransverseMercator::korea_central_belt().project(&Coordinate::new(37.5665, 126.9780));
        assert!(tm.x > 197_000.0 && tm.x < 199_500.0, "x = {}", tm.x);
        assert!(tm.y > 451_000.0 && tm.y < 453_000.0, "y = {}", tm.y);
    }
}
