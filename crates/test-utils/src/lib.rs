//! Shared test utilities for the ESPA geolocation workspace.
//!
//! - Test data path helpers
//! - Skip macros for optional data such as the production land-mass
//!   polygon file
//! - Polygon ring generators
//! - Tolerances and approximate assertions for angles and map units
//! - Scene metadata fixtures
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
//! use test_utils::{assert_approx_eq, fixtures::scenes};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Comparison tolerances for projected and angular quantities.
pub mod tolerance {
    /// Decimal degrees after a forward/inverse round trip.
    pub const DEGREES: f64 = 1e-9;
    /// Map units of the metric projections: a millimetre.
    pub const METERS: f64 = 1e-3;
    /// Packed DMS (`deg * 1e6 + min * 1e3 + sec`): a thousandth of a second.
    pub const PACKED_DMS: f64 = 1e-3;
}

/// Resolve a polygon or scene file through [`find_test_file`], or end the
/// test early when it is not available locally.
///
/// ```ignore
/// #[test]
/// fn test_real_coastline() {
///     let polygons = test_utils::require_test_file!("land_no_buf.ply");
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        let Some(path) = $crate::find_test_file($name) else {
            eprintln!(
                "skipping: {} is not available (set TEST_DATA_DIR or ESPA_LAND_MASS_POLYGON)",
                $name
            );
            return;
        };
        path
    }};
}

/// Assert that two angles, distances or packed DMS values agree within a
/// tolerance, usually one of [`tolerance`].
///
/// ```ignore
/// use test_utils::{assert_approx_eq, tolerance};
///
/// assert_approx_eq!(geo.lon_degrees(), -105.0, tolerance::DEGREES);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual = $actual as f64;
        let expected = $expected as f64;
        let tolerance = $tolerance as f64;
        let off_by = (actual - expected).abs();
        assert!(
            off_by <= tolerance,
            "{} = {} but expected {} (off by {:e}, tolerance {:e})",
            stringify!($actual),
            actual,
            expected,
            off_by,
            tolerance
        );
    }};
}

/// Assert that a map or geographic coordinate pair matches, axis by axis.
///
/// ```ignore
/// use test_utils::{assert_coords_approx_eq, tolerance};
///
/// assert_coords_approx_eq!((x, y), (480_000.0, 4_400_000.0), tolerance::METERS);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $tolerance:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $tolerance);
        $crate::assert_approx_eq!($y1, $y2, $tolerance);
    }};
}
