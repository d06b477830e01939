//! Projection descriptors.
//!
//! A [`ProjectionParams`] carries the kind, zone, datum and the fifteen
//! generic coefficient slots used by GCTP. Slot meaning depends on the kind:
//!
//! | slot | Albers | Polar stereographic | Sinusoidal |
//! |------|--------|---------------------|------------|
//! | 0    |        |                     | sphere radius |
//! | 2    | 1st standard parallel | | |
//! | 3    | 2nd standard parallel | | |
//! | 4    | central meridian | longitude of pole | central meridian |
//! | 5    | latitude of origin | latitude of true scale | |
//! | 6    | false easting | false easting | false easting |
//! | 7    | false northing | false northing | false northing |
//!
//! Angular slots are stored here in decimal degrees. Unused slots are zero.

use serde::{Deserialize, Serialize};

use espa_common::{EspaError, EspaResult};

use crate::angle::{degdms, AngleCheck, AngleCode};
use crate::spheroid::SphereCode;

/// Number of generic projection coefficients.
pub const NPROJ_PARAM: usize = 15;

pub const SPHERE_RADIUS: usize = 0;
pub const STD_PARALLEL_1: usize = 2;
pub const STD_PARALLEL_2: usize = 3;
pub const CENTRAL_MERIDIAN: usize = 4;
pub const ORIGIN_LATITUDE: usize = 5;
pub const FALSE_EASTING: usize = 6;
pub const FALSE_NORTHING: usize = 7;

/// Supported map projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    Geographic,
    Utm,
    PolarStereographic,
    Albers,
    Sinusoidal,
}

impl ProjectionKind {
    /// GCTP projection number.
    pub fn gctp_code(self) -> i32 {
        match self {
            ProjectionKind::Geographic => 0,
            ProjectionKind::Utm => 1,
            ProjectionKind::Albers => 3,
            ProjectionKind::PolarStereographic => 6,
            ProjectionKind::Sinusoidal => 16,
        }
    }

    /// Look up a kind by its GCTP projection number.
    pub fn from_gctp_code(code: i32) -> EspaResult<Self> {
        match code {
            0 => Ok(ProjectionKind::Geographic),
            1 => Ok(ProjectionKind::Utm),
            3 => Ok(ProjectionKind::Albers),
            6 => Ok(ProjectionKind::PolarStereographic),
            16 => Ok(ProjectionKind::Sinusoidal),
            other => Err(EspaError::UnsupportedProjection(format!(
                "GCTP projection code {}; expected GEO (0), UTM (1), ALBERS (3), PS (6) or SIN (16)",
                other
            ))),
        }
    }

    /// Short name used in `Projection=GCTP_<name>`.
    pub fn gctp_name(self) -> &'static str {
        match self {
            ProjectionKind::Geographic => "GEO",
            ProjectionKind::Utm => "UTM",
            ProjectionKind::PolarStereographic => "PS",
            ProjectionKind::Albers => "ALBERS",
            ProjectionKind::Sinusoidal => "SIN",
        }
    }
}

/// Horizontal datum of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Datum {
    #[serde(rename = "WGS84")]
    Wgs84,
    #[serde(rename = "NAD27")]
    Nad27,
    #[serde(rename = "NAD83")]
    Nad83,
    #[serde(rename = "NoDatum")]
    NoDatum,
}

impl Datum {
    pub fn name(self) -> &'static str {
        match self {
            Datum::Wgs84 => "WGS84",
            Datum::Nad27 => "NAD27",
            Datum::Nad83 => "NAD83",
            Datum::NoDatum => "NoDatum",
        }
    }

    /// Spheroid backing this datum for the given projection.
    ///
    /// NoDatum is only meaningful for Sinusoidal grids, which use the
    /// MODIS reference sphere.
    pub fn sphere_code(self, kind: ProjectionKind) -> EspaResult<SphereCode> {
        match self {
            Datum::Wgs84 => Ok(SphereCode::Wgs84),
            Datum::Nad27 => Ok(SphereCode::Clarke1866),
            Datum::Nad83 => Ok(SphereCode::Grs80),
            Datum::NoDatum if kind == ProjectionKind::Sinusoidal => Ok(SphereCode::ModisSphere),
            Datum::NoDatum => Err(EspaError::UnsupportedDatum(format!(
                "NoDatum is only supported with Sinusoidal, not {}",
                kind.gctp_name()
            ))),
        }
    }
}

/// Immutable projection descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub kind: ProjectionKind,
    /// UTM zone, negative for the southern hemisphere. Zero otherwise.
    pub zone: i32,
    pub datum: Datum,
    pub params: [f64; NPROJ_PARAM],
}

impl ProjectionParams {
    /// Geographic lat/lon.
    pub fn geographic(datum: Datum) -> Self {
        Self {
            kind: ProjectionKind::Geographic,
            zone: 0,
            datum,
            params: [0.0; NPROJ_PARAM],
        }
    }

    /// Universal Transverse Mercator. A negative zone selects the southern
    /// hemisphere.
    pub fn utm(zone: i32, datum: Datum) -> Self {
        Self {
            kind: ProjectionKind::Utm,
            zone,
            datum,
            params: [0.0; NPROJ_PARAM],
        }
    }

    /// Polar stereographic, angles in degrees.
    pub fn polar_stereographic(
        longitude_pole: f64,
        latitude_true_scale: f64,
        false_easting: f64,
        false_northing: f64,
        datum: Datum,
    ) -> Self {
        let mut params = [0.0; NPROJ_PARAM];
        params[CENTRAL_MERIDIAN] = longitude_pole;
        params[ORIGIN_LATITUDE] = latitude_true_scale;
        params[FALSE_EASTING] = false_easting;
        params[FALSE_NORTHING] = false_northing;
        Self {
            kind: ProjectionKind::PolarStereographic,
            zone: 0,
            datum,
            params,
        }
    }

    /// Albers Conical Equal Area, angles in degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn albers(
        standard_parallel1: f64,
        standard_parallel2: f64,
        central_meridian: f64,
        origin_latitude: f64,
        false_easting: f64,
        false_northing: f64,
        datum: Datum,
    ) -> Self {
        let mut params = [0.0; NPROJ_PARAM];
        params[STD_PARALLEL_1] = standard_parallel1;
        params[STD_PARALLEL_2] = standard_parallel2;
        params[CENTRAL_MERIDIAN] = central_meridian;
        params[ORIGIN_LATITUDE] = origin_latitude;
        params[FALSE_EASTING] = false_easting;
        params[FALSE_NORTHING] = false_northing;
        Self {
            kind: ProjectionKind::Albers,
            zone: 0,
            datum,
            params,
        }
    }

    /// Sinusoidal on a sphere. A zero radius falls back to the datum's
    /// sphere.
    pub fn sinusoidal(
        sphere_radius: f64,
        central_meridian: f64,
        false_easting: f64,
        false_northing: f64,
        datum: Datum,
    ) -> Self {
        let mut params = [0.0; NPROJ_PARAM];
        params[SPHERE_RADIUS] = sphere_radius;
        params[CENTRAL_MERIDIAN] = central_meridian;
        params[FALSE_EASTING] = false_easting;
        params[FALSE_NORTHING] = false_northing;
        Self {
            kind: ProjectionKind::Sinusoidal,
            zone: 0,
            datum,
            params,
        }
    }

    /// Spheroid for this descriptor's datum.
    pub fn sphere_code(&self) -> EspaResult<SphereCode> {
        self.datum.sphere_code(self.kind)
    }

    /// Copy of the coefficient slots with angular values packed as DMS,
    /// the form the transform routines consume.
    pub fn dms_params(&self) -> EspaResult<[f64; NPROJ_PARAM]> {
        let mut packed = self.params;
        match self.kind {
            ProjectionKind::Geographic | ProjectionKind::Utm => {}
            ProjectionKind::PolarStereographic => {
                packed[CENTRAL_MERIDIAN] =
                    degdms(self.params[CENTRAL_MERIDIAN], AngleCode::Degrees, AngleCheck::Lon)?;
                packed[ORIGIN_LATITUDE] =
                    degdms(self.params[ORIGIN_LATITUDE], AngleCode::Degrees, AngleCheck::Lat)?;
            }
            ProjectionKind::Albers => {
                packed[STD_PARALLEL_1] =
                    degdms(self.params[STD_PARALLEL_1], AngleCode::Degrees, AngleCheck::Lat)?;
                packed[STD_PARALLEL_2] =
                    degdms(self.params[STD_PARALLEL_2], AngleCode::Degrees, AngleCheck::Lat)?;
                packed[CENTRAL_MERIDIAN] =
                    degdms(self.params[CENTRAL_MERIDIAN], AngleCode::Degrees, AngleCheck::Lon)?;
                packed[ORIGIN_LATITUDE] =
                    degdms(self.params[ORIGIN_LATITUDE], AngleCode::Degrees, AngleCheck::Lat)?;
            }
            ProjectionKind::Sinusoidal => {
                packed[CENTRAL_MERIDIAN] =
                    degdms(self.params[CENTRAL_MERIDIAN], AngleCode::Degrees, AngleCheck::Lon)?;
            }
        }
        Ok(packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gctp_codes_round_trip() {
        for kind in [
            ProjectionKind::Geographic,
            ProjectionKind::Utm,
            ProjectionKind::PolarStereographic,
            ProjectionKind::Albers,
            ProjectionKind::Sinusoidal,
        ] {
            assert_eq!(ProjectionKind::from_gctp_code(kind.gctp_code()).unwrap(), kind);
        }
        let err = ProjectionKind::from_gctp_code(4).unwrap_err();
        assert!(matches!(err, EspaError::UnsupportedProjection(_)));
    }

    #[test]
    fn test_datum_mapping() {
        let utm = ProjectionKind::Utm;
        assert_eq!(Datum::Wgs84.sphere_code(utm).unwrap(), SphereCode::Wgs84);
        assert_eq!(Datum::Nad27.sphere_code(utm).unwrap(), SphereCode::Clarke1866);
        assert_eq!(Datum::Nad83.sphere_code(utm).unwrap(), SphereCode::Grs80);
        assert_eq!(
            Datum::NoDatum
                .sphere_code(ProjectionKind::Sinusoidal)
                .unwrap(),
            SphereCode::ModisSphere
        );
        assert!(matches!(
            Datum::NoDatum.sphere_code(utm),
            Err(EspaError::UnsupportedDatum(_))
        ));
    }

    #[test]
    fn test_unused_slots_are_zero() {
        let ps = ProjectionParams::polar_stereographic(-45.0, 70.0, 0.0, 0.0, Datum::Wgs84);
        for (i, value) in ps.params.iter().enumerate() {
            if i != CENTRAL_MERIDIAN && i != ORIGIN_LATITUDE {
                assert_eq!(*value, 0.0, "slot {} should be zero", i);
            }
        }
    }

    #[test]
    fn test_dms_params_albers() {
        let albers =
            ProjectionParams::albers(29.5, 45.5, -96.0, 23.0, 0.0, 0.0, Datum::Nad83);
        let packed = albers.dms_params().unwrap();
        assert!((packed[STD_PARALLEL_1] - 29_030_000.0).abs() < 1e-6);
        assert!((packed[STD_PARALLEL_2] - 45_030_000.0).abs() < 1e-6);
        assert!((packed[CENTRAL_MERIDIAN] + 96_000_000.0).abs() < 1e-6);
        assert!((packed[ORIGIN_LATITUDE] - 23_000_000.0).abs() < 1e-6);
        // Linear slots pass through untouched.
        assert_eq!(packed[FALSE_EASTING], 0.0);
    }

    #[test]
    fn test_dms_params_rejects_bad_latitude() {
        let ps = ProjectionParams::polar_stereographic(0.0, 95.0, 0.0, 0.0, Datum::Wgs84);
        assert!(matches!(ps.dms_params(), Err(EspaError::InvalidAngle(_))));
    }
}
