//! Cartographic transformations.
//!
//! Angle utilities, the supported projections (Geographic, UTM, Polar
//! Stereographic, Albers Conical Equal Area and Sinusoidal) and the
//! forward/inverse dispatch used by the image-space mapping layer.

pub mod albers;
pub mod angle;
pub mod geographic;
mod math;
pub mod params;
pub mod polar;
pub mod sinusoidal;
pub mod spheroid;
pub mod transform;
pub mod utm;

pub use angle::{AngleCheck, AngleCode, AngleUnit};
pub use params::{Datum, ProjectionKind, ProjectionParams, NPROJ_PARAM};
pub use spheroid::{SphereCode, Spheroid};
pub use transform::{ProjTransformation, Projection, Transformer};
