//! Land/water masking.
//!
//! A persisted forest of nested land-mass polygons, point containment
//! queries against it, and the rasterizers that turn it into a per-pixel
//! land/water mask for a projected scene.

pub mod bitmask;
pub mod config;
pub mod containment;
pub mod generate;
pub mod polygon;
pub mod polygon_file;
pub mod shape_mask;

pub use bitmask::BitMask;
pub use config::MaskConfig;
pub use containment::{
    point_in_closed_polygon, point_in_closed_polygon_distance, point_in_shape,
    point_in_shape_distance, Direction, ShapeHit,
};
pub use generate::{generate_land_water_mask, generate_with_config, LandWaterMask};
pub use polygon::{count_polygons, Polygon, PolygonSegment};
pub use polygon_file::{
    dump_polygons, load_polygon_file, load_polygons, reduce_polygons, write_polygon_file,
    MAX_NESTING_DEPTH,
};
pub use shape_mask::{
    shape_mask, shape_mask_projection, shape_mask_projection_with_options, MaskImage,
    ShapeMaskOptions, GRID_SIZE, MASK_VALID,
};
