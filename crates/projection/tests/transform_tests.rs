//! Forward/inverse tests across every supported projection.

use projection::angle::{
    add_once_around, crosses_180, deg_to_dms, degdms, dms_to_deg, AngleCheck, AngleCode,
    AngleUnit,
};
use projection::{Datum, ProjTransformation, Projection, ProjectionParams, Transformer};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, tolerance};

fn round_trip(proj: &ProjectionParams, lon_deg: f64, lat_deg: f64) {
    let t = Transformer::new(proj).unwrap();
    let (x, y) = t.forward(lon_deg.to_radians(), lat_deg.to_radians()).unwrap();
    let (lon, lat) = t.inverse(x, y).unwrap();
    assert!(
        (lon - lon_deg.to_radians()).abs() < 1e-9 && (lat - lat_deg.to_radians()).abs() < 1e-9,
        "{:?} round trip of ({}, {}) gave ({}, {})",
        proj.kind,
        lon_deg,
        lat_deg,
        lon.to_degrees(),
        lat.to_degrees()
    );
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_geographic_round_trip() {
    let proj = ProjectionParams::geographic(Datum::Wgs84);
    round_trip(&proj, -179.5, -60.0);
    round_trip(&proj, 12.25, 45.5);
}

#[test]
fn test_utm_round_trip() {
    let north = ProjectionParams::utm(13, Datum::Wgs84);
    round_trip(&north, -104.2, 39.7);
    round_trip(&north, -107.9, 0.5);

    let south = ProjectionParams::utm(-33, Datum::Nad83);
    round_trip(&south, 16.0, -30.0);

    let clarke = ProjectionParams::utm(17, Datum::Nad27);
    round_trip(&clarke, -80.4, 28.1);
}

#[test]
fn test_polar_stereographic_round_trip() {
    let north = ProjectionParams::polar_stereographic(-45.0, 70.0, 0.0, 0.0, Datum::Wgs84);
    round_trip(&north, -30.0, 75.0);
    round_trip(&north, 120.0, 62.0);

    let south = ProjectionParams::polar_stereographic(0.0, -71.0, 0.0, 0.0, Datum::Wgs84);
    round_trip(&south, 166.7, -77.8);
    round_trip(&south, -60.0, -65.0);
}

#[test]
fn test_albers_round_trip() {
    let conus = ProjectionParams::albers(29.5, 45.5, -96.0, 23.0, 0.0, 0.0, Datum::Nad83);
    round_trip(&conus, -122.4, 37.8);
    round_trip(&conus, -70.0, 44.0);
    round_trip(&conus, -96.0, 23.0);

    let alaska = ProjectionParams::albers(55.0, 65.0, -154.0, 50.0, 0.0, 0.0, Datum::Nad27);
    round_trip(&alaska, -150.0, 61.2);
}

#[test]
fn test_sinusoidal_round_trip() {
    let modis = ProjectionParams::sinusoidal(0.0, 0.0, 0.0, 0.0, Datum::NoDatum);
    round_trip(&modis, -70.5, 9.8);
    round_trip(&modis, 150.0, -45.0);

    let custom = ProjectionParams::sinusoidal(6_370_997.0, 10.0, 1000.0, -2000.0, Datum::Wgs84);
    round_trip(&custom, 20.0, 5.0);
}

// ============================================================================
// Known coordinates
// ============================================================================

#[test]
fn test_albers_false_origin() {
    let proj = ProjectionParams::albers(29.5, 45.5, -96.0, 23.0, 1000.0, 2000.0, Datum::Nad83);
    let t = Transformer::new(&proj).unwrap();
    let (x, y) = t
        .forward((-96.0_f64).to_radians(), 23.0_f64.to_radians())
        .unwrap();
    assert_coords_approx_eq!((x, y), (1000.0, 2000.0), 1e-6);
}

#[test]
fn test_sinusoidal_false_northing() {
    let proj = ProjectionParams::sinusoidal(1.0, 0.0, 0.0, 100.0, Datum::Wgs84);
    let t = Transformer::new(&proj).unwrap();
    let (_, y) = t.forward(0.0, 0.5).unwrap();
    assert_approx_eq!(y, 100.5, 1e-12);
}

#[test]
fn test_utm_to_geographic_degrees() {
    let t = ProjTransformation::to_geographic(&ProjectionParams::utm(13, Datum::Wgs84)).unwrap();
    let (lon, lat) = t.transform(500_000.0, 0.0).unwrap();
    assert_coords_approx_eq!((lon, lat), (-105.0, 0.0), tolerance::DEGREES);
}

#[test]
fn test_utm_to_albers() {
    let source = ProjectionParams::utm(13, Datum::Nad83);
    let target = ProjectionParams::albers(29.5, 45.5, -96.0, 23.0, 0.0, 0.0, Datum::Nad83);
    let forward = ProjTransformation::new(&source, &target).unwrap();
    let back = ProjTransformation::new(&target, &source).unwrap();

    let (ax, ay) = forward.transform(480_000.0, 4_400_000.0).unwrap();
    let (ux, uy) = back.transform(ax, ay).unwrap();
    assert_coords_approx_eq!((ux, uy), (480_000.0, 4_400_000.0), tolerance::METERS);
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_no_datum_requires_sinusoidal() {
    let proj = ProjectionParams::albers(29.5, 45.5, -96.0, 23.0, 0.0, 0.0, Datum::NoDatum);
    assert!(Transformer::new(&proj).is_err());
}

#[test]
fn test_out_of_range_angle_rejected() {
    let proj = ProjectionParams::sinusoidal(0.0, 200.0, 0.0, 0.0, Datum::NoDatum);
    assert!(Transformer::new(&proj).is_err());
}

#[test]
fn test_sinusoidal_beyond_pole_fails() {
    let proj = ProjectionParams::sinusoidal(0.0, 0.0, 0.0, 0.0, Datum::NoDatum);
    let t = Transformer::new(&proj).unwrap();
    assert!(t.inverse(0.0, 1.1e7).is_err());
}

#[test]
fn test_sessions_coexist() {
    let utm = Transformer::new(&ProjectionParams::utm(13, Datum::Wgs84)).unwrap();
    let sin = Transformer::new(&ProjectionParams::sinusoidal(
        0.0,
        0.0,
        0.0,
        0.0,
        Datum::NoDatum,
    ))
    .unwrap();

    let lon = (-104.0_f64).to_radians();
    let lat = 40.0_f64.to_radians();
    let a = utm.forward(lon, lat).unwrap();
    let b = sin.forward(lon, lat).unwrap();
    let a2 = utm.forward(lon, lat).unwrap();
    assert_eq!(a, a2);
    assert!(a != b);
}

// ============================================================================
// Angle utilities
// ============================================================================

#[test]
fn test_dms_round_trip_boundaries() {
    for dms in [89_059_056.4, -179_059_059.996, 0.0, 45_030_000.0, -30_030.0] {
        let back = deg_to_dms(dms_to_deg(dms).unwrap());
        assert_approx_eq!(back, dms, tolerance::PACKED_DMS);
    }
}

#[test]
fn test_degdms_classes() {
    assert_approx_eq!(
        degdms(-179.999999, AngleCode::Degrees, AngleCheck::Lon).unwrap(),
        -179_059_059.996,
        tolerance::PACKED_DMS
    );
    assert!(degdms(90.5, AngleCode::Degrees, AngleCheck::Lat).is_err());
    assert!(degdms(-1.0, AngleCode::Degrees, AngleCheck::Other).is_err());
    assert!(degdms(359.0, AngleCode::Degrees, AngleCheck::Other).is_ok());
}

#[test]
fn test_antimeridian_detection() {
    assert!(crosses_180(
        AngleUnit::Degrees,
        &[179.9, -179.9, 179.8, -179.8]
    ));
    assert!(!crosses_180(AngleUnit::Degrees, &[10.0, 11.0, 12.0, 13.0]));
    assert!(!crosses_180(AngleUnit::Degrees, &[-1.0, 1.0, -2.0, 2.0]));
}

#[test]
fn test_add_once_around_dms_sign_change() {
    let shifted = add_once_around(AngleUnit::Dms, -179_030_000.0).unwrap();
    assert_approx_eq!(shifted, 180_030_000.0, tolerance::PACKED_DMS);

    let plain = add_once_around(AngleUnit::Degrees, -179.5).unwrap();
    assert_approx_eq!(plain, 180.5, 1e-12);
}
