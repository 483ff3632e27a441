//! Coordinate reference system transformations.
//!
//! Implements the map projections the Korean upstream feeds are keyed on,
//! from scratch without external math dependencies.

pub mod ellipsoid;
pub mod lambert;
pub mod transformer;
pub mod transverse_mercator;

pub use ellipsoid::{DatumShift, Ellipsoid};
pub use lambert::{KmaGrid, LambertConformal};
pub use transformer::CoordinateTransformer;
pub use transverse_mercator::TransverseMercator;
