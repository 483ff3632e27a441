//! Shared test utilities for the weather aggregation workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Reference places with known grid cells
//! - Canned upstream response bodies
//! - An in-process stub HTTP server
//! - Approximate-equality assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{bodies, StubServer, StubResponse};
//! ```

pub mod fixtures;
pub mod stub_server;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use stub_server::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that a wall-clock duration is close to an expected one.
///
/// Meant for paused-clock tests, where elapsed time is exact up to
/// scheduling of the auto-advance.
#[macro_export]
macro_rules! assert_duration_near {
    ($actual:expr, $expected:expr, $slack:expr) => {{
        let actual: std::time::Duration = $actual;
        let expected: std::time::Duration = $expected;
        let slack: std::time::Duration = $slack;
        let diff = if actual > expected { actual - expected } else { expected - actual };
        if diff > slack {
            panic!(
                "assertion failed: duration `{:?}` not within `{:?}` of `{:?}`",
                actual, slack, expected
            );
        }
    }};
}
