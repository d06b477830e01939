//! Image-space mapping.
//!
//! A [`MappingSession`] ties a projection to a pixel grid so that
//! (line, sample) positions can be converted to and from geodetic
//! coordinates. Line/sample values are referenced to the upper-left corner
//! of the upper-left pixel, not to pixel centers.

use espa_common::{EspaError, EspaResult};
use projection::{Projection, ProjectionParams, Transformer};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A point in map projection units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCoord {
    pub x: f64,
    pub y: f64,
}

impl MapCoord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geodetic coordinate in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoord {
    pub lon: f64,
    pub lat: f64,
    pub is_fill: bool,
}

impl GeoCoord {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            is_fill: false,
        }
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(lon.to_radians(), lat.to_radians())
    }

    pub fn fill() -> Self {
        Self {
            lon: 0.0,
            lat: 0.0,
            is_fill: true,
        }
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon.to_degrees()
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }
}

/// Sub-pixel image position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImgCoord {
    pub line: f64,
    pub sample: f64,
    pub is_fill: bool,
}

impl ImgCoord {
    pub fn new(line: f64, sample: f64) -> Self {
        Self {
            line,
            sample,
            is_fill: false,
        }
    }

    pub fn fill() -> Self {
        Self {
            line: 0.0,
            sample: 0.0,
            is_fill: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub lines: usize,
    pub samples: usize,
}

/// Geometry of one raster band in its projection.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceDefinition {
    pub proj: ProjectionParams,
    /// Pixel size (x, y) in projection units
    pub pixel_size: [f64; 2],
    /// Map coordinate of the upper-left corner of the upper-left pixel
    pub ul_corner: MapCoord,
    pub img_size: ImageSize,
    /// Radians, positive counter-clockwise from map north
    pub orientation_angle: f64,
}

impl SpaceDefinition {
    /// Check the pixel grid geometry.
    pub fn validate(&self) -> EspaResult<()> {
        if self.img_size.lines < 1 || self.img_size.samples < 1 {
            return Err(EspaError::invalid_parameter(
                "img_size",
                format!(
                    "image must be at least 1x1, got {}x{}",
                    self.img_size.lines, self.img_size.samples
                ),
            ));
        }
        if self.pixel_size.iter().any(|&p| p.is_nan() || p <= 0.0) {
            return Err(EspaError::invalid_parameter(
                "pixel_size",
                format!(
                    "pixel sizes must be positive, got {} x {}",
                    self.pixel_size[0], self.pixel_size[1]
                ),
            ));
        }
        Ok(())
    }
}

/// A configured pixel grid plus its projection transforms.
#[derive(Debug, Clone)]
pub struct MappingSession {
    def: SpaceDefinition,
    transformer: Transformer,
    sin_orien: f64,
    cos_orien: f64,
}

/// Validate a space definition and build its mapping session.
pub fn setup_mapping(def: SpaceDefinition) -> EspaResult<MappingSession> {
    MappingSession::setup(def)
}

impl MappingSession {
    pub fn setup(def: SpaceDefinition) -> EspaResult<Self> {
        def.validate()?;
        let transformer = Transformer::new(&def.proj)?;
        let (sin_orien, cos_orien) = def.orientation_angle.sin_cos();

        debug!(
            projection = def.proj.kind.gctp_name(),
            lines = def.img_size.lines,
            samples = def.img_size.samples,
            pixel_x = def.pixel_size[0],
            pixel_y = def.pixel_size[1],
            "Mapping session ready"
        );

        Ok(Self {
            def,
            transformer,
            sin_orien,
            cos_orien,
        })
    }

    pub fn definition(&self) -> &SpaceDefinition {
        &self.def
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Map a geodetic coordinate to its sub-pixel image position.
    pub fn to_space(&self, geo: &GeoCoord) -> EspaResult<ImgCoord> {
        if geo.is_fill {
            return Err(EspaError::FillInput("to_space".to_string()));
        }

        let (x, y) = self.transformer.forward(geo.lon, geo.lat).map_err(|e| {
            EspaError::projection_failure(format!(
                "forward transform of ({:.6}, {:.6}) failed: {}",
                geo.lon_degrees(),
                geo.lat_degrees(),
                e
            ))
        })?;

        let dx = x - self.def.ul_corner.x;
        let dy = y - self.def.ul_corner.y;

        let dl = dx * self.sin_orien - dy * self.cos_orien;
        let ds = dx * self.cos_orien + dy * self.sin_orien;

        Ok(ImgCoord::new(
            dl / self.def.pixel_size[1],
            ds / self.def.pixel_size[0],
        ))
    }

    /// Map a sub-pixel image position to its geodetic coordinate.
    pub fn from_space(&self, img: &ImgCoord) -> EspaResult<GeoCoord> {
        if img.is_fill {
            return Err(EspaError::FillInput("from_space".to_string()));
        }

        let dl = img.line * self.def.pixel_size[1];
        let ds = img.sample * self.def.pixel_size[0];

        let dy = ds * self.sin_orien - dl * self.cos_orien;
        let dx = ds * self.cos_orien + dl * self.sin_orien;

        let x = self.def.ul_corner.x + dx;
        let y = self.def.ul_corner.y + dy;

        let (lon, lat) = self.transformer.inverse(x, y).map_err(|e| {
            EspaError::projection_failure(format!(
                "inverse transform of ({:.3}, {:.3}) failed: {}",
                x, y, e
            ))
        })?;

        Ok(GeoCoord::new(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::Datum;

    fn geo_def() -> SpaceDefinition {
        SpaceDefinition {
            proj: ProjectionParams::geographic(Datum::Wgs84),
            pixel_size: [1.0, 1.0],
            ul_corner: MapCoord::new(0.0, 0.0),
            img_size: ImageSize {
                lines: 2,
                samples: 2,
            },
            orientation_angle: 0.0,
        }
    }

    #[test]
    fn test_rejects_empty_image() {
        let mut def = geo_def();
        def.img_size.lines = 0;
        let err = setup_mapping(def).unwrap_err();
        assert!(matches!(err, EspaError::InvalidParameter { .. }));
    }

    #[test]
    fn test_rejects_non_positive_pixel() {
        let mut def = geo_def();
        def.pixel_size[1] = 0.0;
        assert!(setup_mapping(def.clone()).is_err());
        def.pixel_size = [f64::NAN, 1.0];
        assert!(setup_mapping(def).is_err());
    }

    #[test]
    fn test_fill_input() {
        let session = setup_mapping(geo_def()).unwrap();
        assert!(matches!(
            session.to_space(&GeoCoord::fill()),
            Err(EspaError::FillInput(_))
        ));
        assert!(matches!(
            session.from_space(&ImgCoord::fill()),
            Err(EspaError::FillInput(_))
        ));
    }

    #[test]
    fn test_geographic_lines_increase_southward() {
        let session = setup_mapping(geo_def()).unwrap();
        let img = session
            .to_space(&GeoCoord::from_degrees(1.5, -0.5))
            .unwrap();
        assert!((img.line - 0.5).abs() < 1e-12);
        assert!((img.sample - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_grid_round_trip() {
        let mut def = geo_def();
        def.orientation_angle = 10.0_f64.to_radians();
        let session = setup_mapping(def).unwrap();
        let img = ImgCoord::new(0.75, 1.25);
        let geo = session.from_space(&img).unwrap();
        let back = session.to_space(&geo).unwrap();
        assert!((back.line - img.line).abs() < 1e-12);
        assert!((back.sample - img.sample).abs() < 1e-12);
    }
}
