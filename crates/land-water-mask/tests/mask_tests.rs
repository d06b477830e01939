//! Polygon store and land/water mask tests.

use std::fs;

use espa_common::{BoundingBox, EspaError};
use geoloc::{MapCoord, SceneMetadata};
use land_water_mask::{
    count_polygons, generate_land_water_mask, generate_with_config, load_polygon_file,
    point_in_shape, shape_mask_projection_with_options, write_polygon_file, MaskConfig,
    MaskImage, Polygon, ShapeMaskOptions, MASK_VALID,
};
use projection::{Datum, ProjectionParams};
use tempfile::TempDir;
use test_utils::fixtures::scenes;
use test_utils::{
    dense_rectangle_ring, rectangle_ring, regular_ring, require_test_file, square_ring,
    temp_test_dir_with_prefix,
};

fn square(id: u32, x: f64, y: f64, size: f64) -> Polygon {
    Polygon::new(id, &square_ring(x, y, size)).unwrap()
}

/// Land over lon 2..18, lat -8..8 with a lake over lon 7..13, lat -3..3.
fn land_with_lake() -> Vec<Polygon> {
    vec![square(1, 2.0, -8.0, 16.0).with_child(square(2, 7.0, -3.0, 6.0))]
}

fn write_forest(dir: &TempDir, forest: &[Polygon]) -> std::path::PathBuf {
    let path = dir.path().join("land.poly");
    write_polygon_file(&path, forest).unwrap();
    path
}

// ============================================================================
// Polygon store
// ============================================================================

#[test]
fn test_hole_semantics() {
    let land = square(1, 0.0, 0.0, 10.0).with_child(square(2, 4.0, 4.0, 2.0));
    let forest = vec![land];

    assert!(!point_in_shape(&forest, 5.0, 5.0).unwrap());
    assert!(point_in_shape(&forest, 1.0, 1.0).unwrap());
    assert!(!point_in_shape(&forest, 20.0, 20.0).unwrap());
}

#[test]
fn test_island_in_lake() {
    let island = square(3, 4.5, 4.5, 1.0);
    let lake = square(2, 4.0, 4.0, 2.0).with_child(island);
    let forest = vec![square(1, 0.0, 0.0, 10.0).with_child(lake)];

    assert!(point_in_shape(&forest, 5.0, 5.0).unwrap());
    assert!(!point_in_shape(&forest, 4.2, 4.2).unwrap());
    assert!(point_in_shape(&forest, 2.0, 2.0).unwrap());
}

#[test]
fn test_polygon_file_round_trip() {
    let dir = temp_test_dir_with_prefix("lwmask_");
    let coast = Polygon::new(7, &dense_rectangle_ring(-20.0, 30.0, -10.0, 40.0, 8))
        .unwrap()
        .with_segments(6)
        .with_child(Polygon::new(8, &regular_ring((-15.0, 35.0), 2.0, 12)).unwrap());
    let forest = vec![
        coast,
        square(9, 100.0, -10.0, 5.0),
        square(10, 120.0, -10.0, 5.0).with_child(square(11, 121.0, -9.0, 1.0)),
    ];
    let path = write_forest(&dir, &forest);

    let loaded = load_polygon_file(&path, &BoundingBox::new(-180.0, -90.0, 180.0, 90.0)).unwrap();
    assert_eq!(loaded, forest);
    assert_eq!(count_polygons(&loaded), 5);
    assert_eq!(loaded[0].segments.len(), 6);
}

#[test]
fn test_load_selects_overlapping_parents() {
    let dir = temp_test_dir_with_prefix("lwmask_");
    let forest = vec![
        square(1, 0.0, 0.0, 10.0),
        square(2, 50.0, 0.0, 10.0).with_child(square(3, 52.0, 2.0, 2.0)),
        square(4, -60.0, 40.0, 5.0),
    ];
    let path = write_forest(&dir, &forest);

    let loaded = load_polygon_file(&path, &BoundingBox::new(45.0, -5.0, 55.0, 5.0)).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, 2);
    assert_eq!(loaded[0].children[0].id, 3);

    let none = load_polygon_file(&path, &BoundingBox::new(150.0, -80.0, 160.0, -70.0)).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_missing_polygon_file() {
    let err = load_polygon_file("/nonexistent/land.poly", &BoundingBox::new(0.0, 0.0, 1.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, EspaError::Io(_)));
}

#[test]
fn test_production_polygon_file() {
    let path = require_test_file!("land_no_buf.ply");

    let colorado =
        load_polygon_file(&path, &BoundingBox::new(-110.0, 35.0, -100.0, 45.0)).unwrap();
    assert!(point_in_shape(&colorado, 39.74, -104.99).unwrap());

    let pacific = load_polygon_file(&path, &BoundingBox::new(-141.0, -1.0, -139.0, 1.0)).unwrap();
    assert!(!point_in_shape(&pacific, 0.0, -140.0).unwrap());
}

// ============================================================================
// Projected rasterizer
// ============================================================================

fn quarter_degree_image() -> MaskImage {
    MaskImage {
        corners: [
            MapCoord::new(0.0, 10.0),
            MapCoord::new(20.0, 10.0),
            MapCoord::new(0.0, -10.0),
            MapCoord::new(20.0, -10.0),
        ],
        pixel_size_x: 0.25,
        pixel_size_y: 0.25,
        nlines: 80,
        nsamps: 80,
    }
}

#[test]
fn test_fast_path_matches_per_pixel() {
    let dir = temp_test_dir_with_prefix("lwmask_");
    let path = write_forest(&dir, &land_with_lake());
    let image = quarter_degree_image();
    let proj = ProjectionParams::geographic(Datum::Wgs84);

    let fast =
        shape_mask_projection_with_options(&path, &image, &proj, ShapeMaskOptions::default())
            .unwrap();
    let slow = shape_mask_projection_with_options(
        &path,
        &image,
        &proj,
        ShapeMaskOptions { fast_path: false },
    )
    .unwrap();

    assert_eq!(fast.len(), 80 * 80);
    assert_eq!(fast, slow);

    let land = fast.iter().filter(|&&v| v == MASK_VALID).count();
    assert!(land > 0 && land < fast.len());

    // lat 0: lon 4 is land, lon 10 is in the lake
    assert_eq!(fast[40 * 80 + 16], MASK_VALID);
    assert_eq!(fast[40 * 80 + 40], 0);
    assert_eq!(fast[0], 0);
}

#[test]
fn test_projected_mask_rejects_empty_image() {
    let dir = temp_test_dir_with_prefix("lwmask_");
    let path = write_forest(&dir, &land_with_lake());
    let mut image = quarter_degree_image();
    image.nlines = 0;

    let err = shape_mask_projection_with_options(
        &path,
        &image,
        &ProjectionParams::geographic(Datum::Wgs84),
        ShapeMaskOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_validation());
}

// ============================================================================
// Scene masks
// ============================================================================

#[test]
fn test_generate_geographic_scene() {
    let dir = temp_test_dir_with_prefix("lwmask_");
    let path = write_forest(&dir, &land_with_lake());
    let scene = SceneMetadata::from_yaml_str(scenes::GEO_QUARTER_DEGREE).unwrap();

    let mask = generate_land_water_mask(&scene, &path).unwrap();
    assert_eq!((mask.nlines, mask.nsamps), (80, 80));
    assert_eq!(mask.value_at(40, 16), Some(MASK_VALID));
    assert_eq!(mask.value_at(40, 40), Some(0));
    assert_eq!(mask.value_at(80, 0), None);
    assert!(mask.land_fraction() > 0.3 && mask.land_fraction() < 0.6);
}

#[test]
fn test_generate_across_antimeridian() {
    let dir = temp_test_dir_with_prefix("lwmask_");
    let forest = vec![
        Polygon::new(1, &rectangle_ring(170.0, 50.0, 180.0, 70.0)).unwrap(),
        Polygon::new(2, &rectangle_ring(-180.0, 50.0, -170.0, 70.0)).unwrap(),
        square(3, 0.0, 0.0, 10.0),
    ];
    let path = write_forest(&dir, &forest);
    let scene = SceneMetadata::from_yaml_str(scenes::UTM_60N_DATELINE).unwrap();

    let mask = generate_land_water_mask(&scene, &path).unwrap();
    assert_eq!(mask.data.len(), 100 * 100);
    assert_eq!(mask.land_fraction(), 1.0);
}

#[test]
fn test_generate_rejects_no_datum() {
    let scene = SceneMetadata::from_yaml_str(scenes::SIN_MODIS).unwrap();
    let err = generate_land_water_mask(&scene, "/nonexistent/land.poly").unwrap_err();
    assert!(matches!(err, EspaError::UnsupportedDatum(_)));
}

#[test]
fn test_generate_with_config_requires_polygon_file() {
    let scene = SceneMetadata::from_yaml_str(scenes::GEO_QUARTER_DEGREE).unwrap();
    let err = generate_with_config(&scene, &MaskConfig::default()).unwrap_err();
    assert!(matches!(err, EspaError::Config(_)));
}

#[test]
fn test_write_raw_mask() {
    let dir = temp_test_dir_with_prefix("lwmask_");
    let path = write_forest(&dir, &land_with_lake());
    let scene = SceneMetadata::from_yaml_str(scenes::GEO_QUARTER_DEGREE).unwrap();

    let config = MaskConfig::new(&path).with_summary(true);
    let mask = generate_with_config(&scene, &config).unwrap();

    let out = dir.path().join("mask.img");
    mask.write_raw(&out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), mask.data);
}
