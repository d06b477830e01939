//! Geographic "projection".
//!
//! Map coordinates are decimal degrees, x = longitude and y = latitude.

use espa_common::{EspaError, EspaResult};

use crate::transform::Projection;

#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl Projection for Geographic {
    fn forward(&self, lon: f64, lat: f64) -> EspaResult<(f64, f64)> {
        Ok((lon.to_degrees(), lat.to_degrees()))
    }

    fn inverse(&self, x: f64, y: f64) -> EspaResult<(f64, f64)> {
        if y.abs() > 90.0 + 1e-9 {
            return Err(EspaError::projection_failure(format!(
                "latitude {} is outside [-90, 90]",
                y
            )));
        }
        Ok((x.to_radians(), y.to_radians()))
    }
}
