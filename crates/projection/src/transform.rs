//! Forward/inverse transform dispatch.
//!
//! A [`Transformer`] is built once from a [`ProjectionParams`] and owns the
//! precomputed constants for its projection. It holds no shared state, so any
//! number of transformers for different projections can be used side by side.

use espa_common::{EspaError, EspaResult};
use tracing::debug;

use crate::albers::Albers;
use crate::angle::dms_to_rad;
use crate::geographic::Geographic;
use crate::params::{
    Datum, ProjectionKind, ProjectionParams, CENTRAL_MERIDIAN, FALSE_EASTING, FALSE_NORTHING,
    ORIGIN_LATITUDE, SPHERE_RADIUS, STD_PARALLEL_1, STD_PARALLEL_2,
};
use crate::polar::PolarStereographic;
use crate::sinusoidal::Sinusoidal;
use crate::utm::TransverseMercator;

/// A map projection: ground (lon, lat) in radians to map (x, y) in
/// projection units, and back.
pub trait Projection {
    fn forward(&self, lon: f64, lat: f64) -> EspaResult<(f64, f64)>;
    fn inverse(&self, x: f64, y: f64) -> EspaResult<(f64, f64)>;
}

/// One of the supported projections, ready to transform.
#[derive(Debug, Clone)]
pub enum Transformer {
    Geographic(Geographic),
    Utm(TransverseMercator),
    PolarStereographic(PolarStereographic),
    Albers(Albers),
    Sinusoidal(Sinusoidal),
}

impl Transformer {
    /// Build the transform pair for a projection descriptor.
    ///
    /// Angular slots are packed to DMS first and unpacked to radians by the
    /// projection setup, so out-of-range angles are rejected here.
    pub fn new(proj: &ProjectionParams) -> EspaResult<Self> {
        let spheroid = proj.sphere_code()?.spheroid();
        let packed = proj.dms_params()?;

        debug!(
            projection = proj.kind.gctp_name(),
            zone = proj.zone,
            datum = proj.datum.name(),
            "Building transformer"
        );

        let transformer = match proj.kind {
            ProjectionKind::Geographic => Transformer::Geographic(Geographic),
            ProjectionKind::Utm => {
                Transformer::Utm(TransverseMercator::utm(proj.zone, spheroid)?)
            }
            ProjectionKind::PolarStereographic => {
                Transformer::PolarStereographic(PolarStereographic::new(
                    spheroid,
                    dms_to_rad(packed[CENTRAL_MERIDIAN])?,
                    dms_to_rad(packed[ORIGIN_LATITUDE])?,
                    packed[FALSE_EASTING],
                    packed[FALSE_NORTHING],
                ))
            }
            ProjectionKind::Albers => Transformer::Albers(Albers::new(
                spheroid,
                dms_to_rad(packed[STD_PARALLEL_1])?,
                dms_to_rad(packed[STD_PARALLEL_2])?,
                dms_to_rad(packed[CENTRAL_MERIDIAN])?,
                dms_to_rad(packed[ORIGIN_LATITUDE])?,
                packed[FALSE_EASTING],
                packed[FALSE_NORTHING],
            )?),
            ProjectionKind::Sinusoidal => {
                let radius = if packed[SPHERE_RADIUS] > 0.0 {
                    packed[SPHERE_RADIUS]
                } else {
                    spheroid.semi_major
                };
                Transformer::Sinusoidal(Sinusoidal::new(
                    radius,
                    dms_to_rad(packed[CENTRAL_MERIDIAN])?,
                    packed[FALSE_EASTING],
                    packed[FALSE_NORTHING],
                ))
            }
        };
        Ok(transformer)
    }

    pub fn kind(&self) -> ProjectionKind {
        match self {
            Transformer::Geographic(_) => ProjectionKind::Geographic,
            Transformer::Utm(_) => ProjectionKind::Utm,
            Transformer::PolarStereographic(_) => ProjectionKind::PolarStereographic,
            Transformer::Albers(_) => ProjectionKind::Albers,
            Transformer::Sinusoidal(_) => ProjectionKind::Sinusoidal,
        }
    }

    fn inner(&self) -> &dyn Projection {
        match self {
            Transformer::Geographic(p) => p,
            Transformer::Utm(p) => p,
            Transformer::PolarStereographic(p) => p,
            Transformer::Albers(p) => p,
            Transformer::Sinusoidal(p) => p,
        }
    }
}

impl Projection for Transformer {
    fn forward(&self, lon: f64, lat: f64) -> EspaResult<(f64, f64)> {
        let (x, y) = self.inner().forward(lon, lat)?;
        if !x.is_finite() || !y.is_finite() {
            return Err(EspaError::projection_failure(format!(
                "{} forward transform of ({}, {}) is not finite",
                self.kind().gctp_name(),
                lon,
                lat
            )));
        }
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> EspaResult<(f64, f64)> {
        let (lon, lat) = self.inner().inverse(x, y)?;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(EspaError::projection_failure(format!(
                "{} inverse transform of ({}, {}) is not finite",
                self.kind().gctp_name(),
                x,
                y
            )));
        }
        Ok((lon, lat))
    }
}

/// Map-to-map transformation between two projections: inverse through the
/// source, forward through the target. No datum shift is applied.
#[derive(Debug, Clone)]
pub struct ProjTransformation {
    source: Transformer,
    target: Transformer,
}

impl ProjTransformation {
    pub fn new(source: &ProjectionParams, target: &ProjectionParams) -> EspaResult<Self> {
        Ok(Self {
            source: Transformer::new(source)?,
            target: Transformer::new(target)?,
        })
    }

    /// Transformation from `source` into WGS84 geographic decimal degrees.
    pub fn to_geographic(source: &ProjectionParams) -> EspaResult<Self> {
        Self::new(source, &ProjectionParams::geographic(Datum::Wgs84))
    }

    pub fn transform(&self, x: f64, y: f64) -> EspaResult<(f64, f64)> {
        let (lon, lat) = self.source.inverse(x, y)?;
        self.target.forward(lon, lat)
    }
}
