//! Coordinate representations produced for the upstream providers.

use serde::{Deserialize, Serialize};

/// A WGS84 point in decimal degrees.
///
/// Only [`crate::ServiceArea::validate`] hands these out to the aggregation
/// path, so every `Coordinate` seen downstream lies inside the service area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Cell index on the KMA short-range forecast grid (`nx`, `ny`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Planar "TM" coordinate (Korea central belt, meters) used by the
/// measurement-station locator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TmCoordinate {
    pub x: f64,
    pub y: f64,
}

impl TmCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
