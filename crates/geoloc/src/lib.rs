//! Scene geolocation.
//!
//! Maps between image (line, sample) positions and geodetic coordinates for
//! a projected raster, computes scene bounds, reads scene metadata and
//! writes HDF-EOS structural metadata.

pub mod bounds;
pub mod scene;
pub mod space;
pub mod struct_meta;

pub use bounds::{compute_bounds, GeoBounds};
pub use scene::{get_geoloc_info, Band, DataType, GridOrigin, ProjectionInfo, SceneMetadata};
pub use space::{
    setup_mapping, GeoCoord, ImageSize, ImgCoord, MapCoord, MappingSession, SpaceDefinition,
};
pub use struct_meta::write_struct_metadata;
