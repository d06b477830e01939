//! Scene metadata.
//!
//! A scene document describes the projection of a product and its bands.
//! It is read from YAML:
//!
//! ```yaml
//! projection:
//!   kind: utm
//!   datum: WGS84
//!   units: meters
//!   grid_origin: UL
//!   ul_corner: [500000.0, 4430000.0]
//!   lr_corner: [502970.0, 4427030.0]
//!   utm_zone: 13
//! orientation_angle: 0.0
//! bands:
//!   - name: band1
//!     product: L1T
//!     short_name: LT5SR
//!     file_name: scene_band1.img
//!     data_type: INT16
//!     nlines: 100
//!     nsamps: 100
//!     pixel_size: [30.0, 30.0]
//! ```
//!
//! Corners are map coordinates of the upper-left and lower-right pixels,
//! referenced to either the pixel's upper-left corner or its center as
//! given by `grid_origin`.

use std::path::Path;

use espa_common::{EspaError, EspaResult};
use projection::{Datum, ProjectionKind, ProjectionParams};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::space::{ImageSize, MapCoord, SpaceDefinition};

/// Band used for scene-level geolocation.
pub const REPRESENTATIVE_BAND: &str = "band1";

/// Which point of a pixel the corner coordinates refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridOrigin {
    #[serde(rename = "UL")]
    UpperLeft,
    #[serde(rename = "CENTER")]
    Center,
}

/// Band sample type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl DataType {
    /// HDF number type name.
    pub fn dfnt_name(self) -> &'static str {
        match self {
            DataType::Int8 => "DFNT_INT8",
            DataType::Uint8 => "DFNT_UINT8",
            DataType::Int16 => "DFNT_INT16",
            DataType::Uint16 => "DFNT_UINT16",
            DataType::Int32 => "DFNT_INT32",
            DataType::Uint32 => "DFNT_UINT32",
            DataType::Float32 => "DFNT_FLOAT32",
            DataType::Float64 => "DFNT_FLOAT64",
        }
    }
}

/// Projection block of a scene document. Angles are decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInfo {
    pub kind: ProjectionKind,
    pub datum: Datum,
    #[serde(default = "default_units")]
    pub units: String,
    pub grid_origin: GridOrigin,
    pub ul_corner: [f64; 2],
    pub lr_corner: [f64; 2],

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_zone: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_parallel1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_parallel2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude_pole: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude_true_scale: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere_radius: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub central_meridian: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_easting: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_northing: Option<f64>,
}

fn default_units() -> String {
    "meters".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub product: String,
    pub short_name: String,
    pub file_name: String,
    pub data_type: DataType,
    pub nlines: usize,
    pub nsamps: usize,
    /// (x, y) in projection units
    pub pixel_size: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub projection: ProjectionInfo,
    /// Degrees
    #[serde(default)]
    pub orientation_angle: f64,
    pub bands: Vec<Band>,
}

impl SceneMetadata {
    pub fn from_yaml_str(doc: &str) -> EspaResult<Self> {
        Ok(serde_yaml::from_str(doc)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> EspaResult<Self> {
        let path = path.as_ref();
        let doc = std::fs::read_to_string(path).map_err(|e| {
            EspaError::io(format!("reading scene metadata {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&doc)
    }

    /// Check that the projection block carries exactly the fields its kind
    /// uses and that the representative band exists.
    pub fn validate(&self) -> EspaResult<()> {
        let proj = &self.projection;
        let kind = proj.kind;

        let present: [(&str, bool); 10] = [
            ("utm_zone", proj.utm_zone.is_some()),
            ("standard_parallel1", proj.standard_parallel1.is_some()),
            ("standard_parallel2", proj.standard_parallel2.is_some()),
            ("origin_latitude", proj.origin_latitude.is_some()),
            ("longitude_pole", proj.longitude_pole.is_some()),
            ("latitude_true_scale", proj.latitude_true_scale.is_some()),
            ("sphere_radius", proj.sphere_radius.is_some()),
            ("central_meridian", proj.central_meridian.is_some()),
            ("false_easting", proj.false_easting.is_some()),
            ("false_northing", proj.false_northing.is_some()),
        ];

        let (allowed, mandatory) = kind_fields(kind);
        for (field, is_present) in present {
            if is_present && !allowed.contains(&field) {
                return Err(EspaError::schema_mismatch(format!(
                    "{} is not valid for {} projection",
                    field,
                    kind.gctp_name()
                )));
            }
        }
        for field in mandatory {
            let is_present = present
                .iter()
                .any(|(name, is_present)| name == field && *is_present);
            if !is_present {
                return Err(EspaError::invalid_parameter(
                    *field,
                    format!("required for {} projection", kind.gctp_name()),
                ));
            }
        }

        if self.bands.is_empty() {
            return Err(EspaError::InvalidMetadata(
                "scene has no bands".to_string(),
            ));
        }
        self.representative_band()?;
        Ok(())
    }

    pub fn representative_band(&self) -> EspaResult<&Band> {
        self.bands
            .iter()
            .find(|b| b.name == REPRESENTATIVE_BAND)
            .ok_or_else(|| {
                EspaError::InvalidMetadata(format!(
                    "representative band {} not found",
                    REPRESENTATIVE_BAND
                ))
            })
    }

    /// Projection descriptor for the scene, angles in decimal degrees.
    pub fn projection_params(&self) -> EspaResult<ProjectionParams> {
        let proj = &self.projection;
        let datum = proj.datum;
        let fe = proj.false_easting.unwrap_or(0.0);
        let fn_ = proj.false_northing.unwrap_or(0.0);

        let params = match proj.kind {
            ProjectionKind::Geographic => ProjectionParams::geographic(datum),
            ProjectionKind::Utm => {
                ProjectionParams::utm(required(proj.utm_zone, "utm_zone")?, datum)
            }
            ProjectionKind::Albers => ProjectionParams::albers(
                required(proj.standard_parallel1, "standard_parallel1")?,
                required(proj.standard_parallel2, "standard_parallel2")?,
                required(proj.central_meridian, "central_meridian")?,
                required(proj.origin_latitude, "origin_latitude")?,
                fe,
                fn_,
                datum,
            ),
            ProjectionKind::PolarStereographic => ProjectionParams::polar_stereographic(
                required(proj.longitude_pole, "longitude_pole")?,
                required(proj.latitude_true_scale, "latitude_true_scale")?,
                fe,
                fn_,
                datum,
            ),
            ProjectionKind::Sinusoidal => ProjectionParams::sinusoidal(
                proj.sphere_radius.unwrap_or(0.0),
                required(proj.central_meridian, "central_meridian")?,
                fe,
                fn_,
                datum,
            ),
        };

        // Reject datum/projection combinations up front.
        params.sphere_code()?;
        Ok(params)
    }
}

/// Fields a projection kind accepts, and the subset it requires.
fn kind_fields(kind: ProjectionKind) -> (&'static [&'static str], &'static [&'static str]) {
    match kind {
        ProjectionKind::Geographic => (&[], &[]),
        ProjectionKind::Utm => (&["utm_zone"], &["utm_zone"]),
        ProjectionKind::Albers => (
            &[
                "standard_parallel1",
                "standard_parallel2",
                "central_meridian",
                "origin_latitude",
                "false_easting",
                "false_northing",
            ],
            &[
                "standard_parallel1",
                "standard_parallel2",
                "central_meridian",
                "origin_latitude",
            ],
        ),
        ProjectionKind::PolarStereographic => (
            &[
                "longitude_pole",
                "latitude_true_scale",
                "false_easting",
                "false_northing",
            ],
            &["longitude_pole", "latitude_true_scale"],
        ),
        ProjectionKind::Sinusoidal => (
            &[
                "sphere_radius",
                "central_meridian",
                "false_easting",
                "false_northing",
            ],
            &["central_meridian"],
        ),
    }
}

fn required<T>(value: Option<T>, field: &str) -> EspaResult<T> {
    value.ok_or_else(|| EspaError::invalid_parameter(field, "missing from projection block"))
}

/// Geolocation space of the scene's representative band.
///
/// A `CENTER` grid origin moves the upper-left corner out by half a pixel so
/// that the space is referenced to the corner of the upper-left pixel.
pub fn get_geoloc_info(scene: &SceneMetadata) -> EspaResult<SpaceDefinition> {
    build_space(scene).map_err(|e| {
        error!(function = "get_geoloc_info", error = %e, "Building geolocation space failed");
        e
    })
}

fn build_space(scene: &SceneMetadata) -> EspaResult<SpaceDefinition> {
    scene.validate()?;
    let band = scene.representative_band()?;
    let proj = scene.projection_params()?;

    let [psx, psy] = band.pixel_size;
    let [mut ul_x, mut ul_y] = scene.projection.ul_corner;
    if scene.projection.grid_origin == GridOrigin::Center {
        ul_x -= 0.5 * psx;
        ul_y += 0.5 * psy;
    }

    debug!(
        band = %band.name,
        projection = proj.kind.gctp_name(),
        ul_x = ul_x,
        ul_y = ul_y,
        "Scene geolocation"
    );

    Ok(SpaceDefinition {
        proj,
        pixel_size: band.pixel_size,
        ul_corner: MapCoord::new(ul_x, ul_y),
        img_size: ImageSize {
            lines: band.nlines,
            samples: band.nsamps,
        },
        orientation_angle: scene.orientation_angle.to_radians(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::params::{CENTRAL_MERIDIAN, STD_PARALLEL_1};
    use test_utils::fixtures::scenes;

    #[test]
    fn test_parse_utm() {
        let scene = SceneMetadata::from_yaml_str(scenes::UTM_13N).unwrap();
        assert_eq!(scene.projection.kind, ProjectionKind::Utm);
        assert_eq!(scene.projection.utm_zone, Some(13));
        assert_eq!(scene.bands.len(), 3);
        assert_eq!(scene.bands[2].data_type, DataType::Int16);
        scene.validate().unwrap();
    }

    #[test]
    fn test_bad_yaml_is_invalid_metadata() {
        let err = SceneMetadata::from_yaml_str("projection: [").unwrap_err();
        assert!(matches!(err, EspaError::InvalidMetadata(_)));
    }

    #[test]
    fn test_schema_mismatch() {
        let scene = SceneMetadata::from_yaml_str(scenes::UTM_WITH_ALBERS_FIELDS).unwrap();
        let err = scene.validate().unwrap_err();
        assert!(matches!(err, EspaError::SchemaMismatch(_)), "{:?}", err);
    }

    #[test]
    fn test_missing_required_field() {
        let mut scene = SceneMetadata::from_yaml_str(scenes::ALBERS_CONUS).unwrap();
        scene.projection.origin_latitude = None;
        let err = scene.validate().unwrap_err();
        assert!(matches!(err, EspaError::InvalidParameter { .. }));
    }

    #[test]
    fn test_missing_band1() {
        let mut scene = SceneMetadata::from_yaml_str(scenes::GEO_2X2).unwrap();
        scene.bands[0].name = "sr_band1".to_string();
        assert!(matches!(
            scene.representative_band(),
            Err(EspaError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn test_center_origin_shift() {
        let scene = SceneMetadata::from_yaml_str(scenes::ALBERS_CONUS).unwrap();
        let space = get_geoloc_info(&scene).unwrap();
        assert_eq!(space.ul_corner, MapCoord::new(1_500_000.0, 2_000_000.0));
        assert_eq!(space.proj.params[STD_PARALLEL_1], 29.5);
        assert_eq!(space.proj.params[CENTRAL_MERIDIAN], -96.0);
        assert_eq!(space.img_size, ImageSize { lines: 60, samples: 60 });
    }

    #[test]
    fn test_no_datum_only_with_sinusoidal() {
        let scene = SceneMetadata::from_yaml_str(scenes::SIN_MODIS).unwrap();
        get_geoloc_info(&scene).unwrap();

        let mut utm = SceneMetadata::from_yaml_str(scenes::UTM_13N).unwrap();
        utm.projection.datum = Datum::NoDatum;
        assert!(matches!(
            get_geoloc_info(&utm),
            Err(EspaError::UnsupportedDatum(_))
        ));
    }

    #[test]
    fn test_orientation_in_radians() {
        let mut scene = SceneMetadata::from_yaml_str(scenes::GEO_2X2).unwrap();
        scene.orientation_angle = 90.0;
        let space = get_geoloc_info(&scene).unwrap();
        assert!((space.orientation_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }
}
