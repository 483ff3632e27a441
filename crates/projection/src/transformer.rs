//! The two planar systems the upstream feeds are keyed on.

use weather_common::{Coordinate, GridCell, TmCoordinate};

use crate::lambert::KmaGrid;
use crate::transverse_mercator::TransverseMercator;

/// Converts WGS84 coordinates into the KMA forecast grid and the Korean TM
/// plane. Both conversions are pure and cheap; one instance is shared by
/// all requests.
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    grid: KmaGrid,
    tm: TransverseMercator,
}

impl CoordinateTransformer {
    pub fn new(grid: KmaGrid, tm: TransverseMercator) -> Self {
        Self { grid, tm }
    }

    /// KMA short-range grid cell (`nx`, `ny`).
    pub fn to_grid(&self, coord: &Coordinate) -> GridCell {
        self.grid.to_cell(coord)
    }

    /// Korean central-belt TM coordinate (`tmX`, `tmY`).
    pub fn to_tm(&self, coord: &Coordinate) -> TmCoordinate {
        self.tm.project(coord)
    }
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self::new(KmaGrid::default(), TransverseMercator::korea_central_belt())
    }
}
