//! Geographic bounds of a scene by walking its perimeter.

use espa_common::EspaResult;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::space::{GeoCoord, ImgCoord, MappingSession};

/// Bounding coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    fn seed(geo: &GeoCoord) -> Self {
        let (lon, lat) = (geo.lon_degrees(), geo.lat_degrees());
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        }
    }

    fn fold(&mut self, geo: &GeoCoord) {
        let (lon, lat) = (geo.lon_degrees(), geo.lat_degrees());
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
    }
}

/// Bounding lat/lon of an `nlines` x `nsamps` image.
///
/// Walks the outer edges of the image: samples 0..=nsamps along the top and
/// bottom rows and lines 0..=nlines along the left and right columns, so
/// the far edge of the last pixel is included. Extremes strictly inside the
/// image, as around a pole in a polar projection, are not detected.
pub fn compute_bounds(
    session: &MappingSession,
    nlines: usize,
    nsamps: usize,
) -> EspaResult<GeoBounds> {
    let locate = |line: usize, sample: usize| {
        session
            .from_space(&ImgCoord::new(line as f64, sample as f64))
            .map_err(|e| {
                error!(
                    function = "compute_bounds",
                    line = line,
                    sample = sample,
                    error = %e,
                    "Mapping image coordinate failed"
                );
                e
            })
    };

    let mut bounds = GeoBounds::seed(&locate(0, 0)?);

    for sample in 0..=nsamps {
        bounds.fold(&locate(0, sample)?);
        bounds.fold(&locate(nlines, sample)?);
    }
    for line in 0..=nlines {
        bounds.fold(&locate(line, 0)?);
        bounds.fold(&locate(line, nsamps)?);
    }

    Ok(bounds)
}
