//! Reference ellipsoids and a three-parameter geocentric datum shift.

/// A reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Flattening
    pub f: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    pub const BESSEL_1841: Ellipsoid = Ellipsoid {
        a: 6_377_397.155,
        f: 1.0 / 299.152_812_8,
    };

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// Second eccentricity squared.
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }

    /// Prime vertical radius of curvature at latitude `lat` (radians).
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        self.a / (1.0 - self.e2() * lat.sin().powi(2)).sqrt()
    }

    /// Geodetic (radians, meters) to earth-centred earth-fixed XYZ.
    pub fn to_geocentric(&self, lat: f64, lon: f64, h: f64) -> [f64; 3] {
        let n = self.prime_vertical_radius(lat);
        [
            (n + h) * lat.cos() * lon.cos(),
            (n + h) * lat.cos() * lon.sin(),
            (n * (1.0 - self.e2()) + h) * lat.sin(),
        ]
    }

    /// Earth-centred XYZ back to geodetic (radians, radians, meters).
    pub fn from_geocentric(&self, xyz: [f64; 3]) -> (f64, f64, f64) {
        let [x, y, z] = xyz;
        let e2 = self.e2();
        let lon = y.atan2(x);
        let p = (x * x + y * y).sqrt();

        let mut lat = z.atan2(p * (1.0 - e2));
        let mut h = 0.0;
        // Converges to sub-millimetre in a handful of rounds at these latitudes
        for _ in 0..6 {
            let n = self.prime_vertical_radius(lat);
            h = p / lat.cos() - n;
            lat = z.atan2(p * (1.0 - e2 * n / (n + h)));
        }

        (lat, lon, h)
    }
}

/// Translation from a local datum to WGS84, in meters (the `towgs84`
/// three-parameter form).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatumShift {
    pub local: Ellipsoid,
    pub to_wgs84: [f64; 3],
}

impl DatumShift {
    /// Korean 1985 (Bessel) datum used by the legacy "TM" planar systems.
    pub const KOREAN_1985: DatumShift = DatumShift {
        local: Ellipsoid::BESSEL_1841,
        to_wgs84: [-146.43, 507.89, 681.46],
    };

    /// Move a WGS84 point (degrees) onto the local datum (degrees).
    pub fn from_wgs84(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let [x, y, z] = Ellipsoid::WGS84.to_geocentric(lat_deg.to_radians(), lon_deg.to_radians(), 0.0);
        let [dx, dy, dz] = self.to_wgs84;
        let (lat, lon, _) = self.local.from_geocentric([x - dx, y - dy, z - dz]);
        (lat.to_degrees(), lon.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocentric_roundtrip() {
        let e = Ellipsoid::WGS84;
        let (lat, lon) = (37.5_f64.to_radians(), 127.0_f64.to_radians());
        let xyz = e.to_geocentric(lat, lon, 120.0);
        let (lat2, lon2, h2) = e.from_geocentric(xyz);
        assert!((lat - lat2).abs() < 1e-11);
        assert!((lon - lon2).abs() < 1e-11);
        assert!((h2 - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_korean_datum_shift_magnitude() {
        // Korean 1985 coordinates sit a few arc-seconds off WGS84
        let (lat, lon) = DatumShift::KOREAN_1985.from_wgs84(37.5, 127.0);
        let dlat_sec = (lat - 37.5) * 3600.0;
        let dlon_sec = (lon - 127.0) * 3600.0;
        assert!(dlat_sec.abs() > 5.0 && dlat_sec.abs() < 15.0, "dlat {}\"", dlat_sec);
        assert!(dlon_sec.abs() > 2.0 && dlon_sec.abs() < 15.0, "dlon {}\"", dlon_sec);
    }
}
