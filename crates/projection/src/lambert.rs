//! Lambert Conformal Conic projection on a sphere.
//!
//! The KMA short-range forecast products are laid out on a 5 km grid in
//! this projection. The projection maps a cone secant to the Earth at two
//! standard parallels onto a flat plane.
//!
//! Parameters:
//! - Origin latitude/longitude (lat0, lon0): maps to plane (0, 0)
//! - Standard parallels: latin1 and latin2 (can be equal for tangent cone)
//! - Earth radius and grid spacing, both in kilometres
//!
//! All plane coordinates here are in grid units (radius / spacing), so the
//! integer grid cell falls out of a single rounding step.

use std::f64::consts::PI;

use weather_common::{Coordinate, GridCell};

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Origin latitude in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// Earth radius (km)
    pub earth_radius: f64,
    /// Grid spacing (km)
    pub grid_spacing: f64,
    /// Earth radius in grid units
    re: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the origin latitude, in grid units
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from its defining parameters (degrees, km).
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        earth_radius: f64,
        grid_spacing: f64,
    ) -> Self {
        let to_rad = PI / 180.0;

        let lat0 = lat0_deg * to_rad;
        let lon0 = lon0_deg * to_rad;
        let latin1 = latin1_deg * to_rad;
        let latin2 = latin2_deg * to_rad;

        let re = earth_radius / grid_spacing;

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio = ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = ((PI / 4.0 + latin1 / 2.0).tan().powf(n) * latin1.cos()) / n;

        let rho0 = re * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            lat0,
            latin1,
            latin2,
            earth_radius,
            grid_spacing,
            re,
            n,
            f,
            rho0,
        }
    }

    /// KMA short-range forecast grid projection.
    ///
    /// - Standard parallels: 30°N and 60°N
    /// - Origin: 38°N, 126°E
    /// - Earth radius 6371.00877 km, 5 km cells
    pub fn kma_short_range() -> Self {
        Self::new(38.0, 126.0, 30.0, 60.0, 6371.00877, 5.0)
    }

    /// Convert geographic coordinates (degrees) to plane coordinates in grid
    /// units relative to the origin. `y` grows northwards.
    pub fn geo_to_grid(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        // Normalize longitude difference to (-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon <= -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.re * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();

        (x, y)
    }

    /// Convert plane coordinates in grid units back to (lat, lon) in degrees.
    pub fn grid_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;

        let yn = self.rho0 - y;
        let rho = (x * x + yn * yn).sqrt();
        let rho = if self.n < 0.0 { -rho } else { rho };

        let theta = if yn.abs() < f64::EPSILON && x.abs() < f64::EPSILON {
            0.0
        } else {
            x.atan2(yn)
        };

        let lat = 2.0 * ((self.re * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        (lat * to_deg, lon * to_deg)
    }
}

/// The integer KMA forecast grid: the projection plus the cell offset of
/// the origin.
#[derive(Debug, Clone)]
pub struct KmaGrid {
    projection: LambertConformal,
    /// Grid column of the projection origin
    origin_x: f64,
    /// Grid row of the projection origin
    origin_y: f64,
}

impl KmaGrid {
    pub fn new(projection: LambertConformal, origin_x: f64, origin_y: f64) -> Self {
        Self {
            projection,
            origin_x,
            origin_y,
        }
    }

    /// Cell containing a coordinate (round half up).
    pub fn to_cell(&self, coord: &Coordinate) -> GridCell {
        let (x, y) = self.projection.geo_to_grid(coord.latitude, coord.longitude);
        GridCell::new(
            (x + self.origin_x + 0.5).floor() as i32,
            (y + self.origin_y + 0.5).floor() as i32,
        )
    }

    /// Geographic center of a cell.
    pub fn cell_center(&self, cell: GridCell) -> Coordinate {
        let (lat, lon) = self.projection.grid_to_geo(
            f64::from(cell.x) - self.origin_x,
            f64::from(cell.y) - self.origin_y,
        );
        Coordinate::new(lat, lon)
    }
}

impl Default for KmaGrid {
    fn default() -> Self {
        Self::new(LambertConformal::kma_short_range(), 43.0, 136.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn cell(lat: f64, lon: f64) -> GridCell {
        KmaGrid::default().to_cell(&Coordinate::new(lat, lon))
    }

    #[test]
    fn test_origin_maps_to_origin_cell() {
        assert_eq!(cell(38.0, 126.0), GridCell::new(43, 136));
    }

    #[test]
    fn test_reference_cells() {
        // Reference cells published with the KMA short-range API grid table
        assert_eq!(cell(37.5665, 126.9780), GridCell::new(60, 127), "Seoul City Hall");
        assert_eq!(cell(35.1796, 129.0756), GridCell::new(98, 76), "Busan City Hall");
        assert_eq!(cell(33.4996, 126.5312), GridCell::new(53, 38), "Jeju City");
    }

    #[test]
    fn test_deterministic() {
        let a = cell(36.3504, 127.3845);
        let b = cell(36.3504, 127.3845);
        assert_eq!(a, b);
    }

    #[test]
    fn test_plane_origin_is_zero() {
        let proj = LambertConformal::kma_short_range();
        let (x, y) = proj.geo_to_grid(38.0, 126.0);
        assert!(x.abs() < 1e-9, "x should be ~0, got {}", x);
        assert!(y.abs() < 1e-9, "y should be ~0, got {}", y);
    }

    #[test]
    fn test_roundtrip() {
        let proj = LambertConformal::kma_short_range();

        let (x, y) = proj.geo_to_grid(35.5, 128.25);
        let (lat, lon) = proj.grid_to_geo(x, y);

        assert_approx_eq!(lat, 35.5, 1e-9);
        assert_approx_eq!(lon, 128.25, 1e-9);
    }

    #[test]
    fn test_cell_center_falls_in_same_cell() {
        let grid = KmaGrid::default();
        let c = GridCell::new(60, 127);
        let center = grid.cell_center(c);
        assert_eq!(grid.to_cell(&center), c);
    }

    #[test]
    fn test_grid_axes() {
        // East increases x, north increases y
        let base = cell(36.0, 127.0);
        let east = cell(36.0, 127.5);
        let north = cell(36.5, 127.0);
        assert!(east.x > base.x);
        assert!(north.y > base.y);
    }
}
