//! HDF-EOS structural metadata text.
//!
//! Produces the `GROUP=GridStructure` document HDF-EOS readers use to find
//! grids in an HDF4 file. Bands are grouped into one grid per distinct pixel
//! size, in order of first appearance.

use std::fmt::{self, Write as _};

use espa_common::{EspaError, EspaResult};
use projection::angle::deg_to_dms;
use projection::params::{CENTRAL_MERIDIAN, ORIGIN_LATITUDE, STD_PARALLEL_1, STD_PARALLEL_2};
use projection::{Datum, ProjectionKind, ProjectionParams, NPROJ_PARAM};

use crate::scene::{Band, GridOrigin, SceneMetadata};

const GRID_NAME: &str = "Grid";

const HEADER: &str = "\nGROUP=SwathStructure\nEND_GROUP=SwathStructure\nGROUP=GridStructure\n";
const TRAILER: &str = "END_GROUP=GridStructure\nGROUP=PointStructure\nEND_GROUP=PointStructure\nEND\n";

/// Build the structural metadata for every band in `scene`.
pub fn write_struct_metadata(scene: &SceneMetadata) -> EspaResult<String> {
    if scene.bands.is_empty() {
        return Err(EspaError::InvalidMetadata(
            "cannot describe a scene with no bands".to_string(),
        ));
    }
    let proj = scene.projection_params()?;
    let sphere_code = if proj.kind != ProjectionKind::Geographic && proj.datum != Datum::NoDatum {
        Some(proj.sphere_code()?.code())
    } else {
        None
    };

    let mut out = String::from(HEADER);
    for (index, group) in resolution_groups(&scene.bands).iter().enumerate() {
        write_grid(&mut out, scene, &proj, sphere_code, index + 1, group).map_err(|e| {
            EspaError::InvalidMetadata(format!("formatting grid {}: {}", index + 1, e))
        })?;
    }
    out.push_str(TRAILER);
    Ok(out)
}

/// One `GRID_n` group covering the bands of a single resolution.
fn write_grid(
    out: &mut String,
    scene: &SceneMetadata,
    proj: &ProjectionParams,
    sphere_code: Option<i32>,
    grid_number: usize,
    group: &[&Band],
) -> fmt::Result {
    let kind = proj.kind;
    let first = group[0];
    let [psx, psy] = first.pixel_size;

    let grid_name = if grid_number == 1 {
        GRID_NAME.to_string()
    } else if kind == ProjectionKind::Geographic {
        format!("{}_{}", GRID_NAME, grid_number)
    } else {
        format!("{}_{}", GRID_NAME, psx as i64)
    };

    let [mut ul_x, mut ul_y] = scene.projection.ul_corner;
    let [mut lr_x, mut lr_y] = scene.projection.lr_corner;
    if scene.projection.grid_origin == GridOrigin::Center {
        ul_x -= 0.5 * psx;
        ul_y += 0.5 * psy;
        lr_x -= 0.5 * psx;
        lr_y += 0.5 * psy;
    }

    writeln!(out, "\tGROUP=GRID_{}", grid_number)?;
    writeln!(out, "\t\tGridName=\"{}\"", grid_name)?;
    writeln!(out, "\t\tXDim={}", first.nsamps)?;
    writeln!(out, "\t\tYDim={}", first.nlines)?;
    writeln!(out, "\t\tPixelSize={},{}", format_g(psx), format_g(psy))?;

    if kind == ProjectionKind::Geographic {
        writeln!(
            out,
            "\t\tUpperLeftPointMtrs=({:.2},{:.2})",
            deg_to_dms(ul_x),
            deg_to_dms(ul_y)
        )?;
        writeln!(
            out,
            "\t\tLowerRightMtrs=({:.2},{:.2})",
            deg_to_dms(lr_x),
            deg_to_dms(lr_y)
        )?;
    } else {
        writeln!(out, "\t\tUpperLeftPointMtrs=({:.6},{:.6})", ul_x, ul_y)?;
        writeln!(out, "\t\tLowerRightMtrs=({:.6},{:.6})", lr_x, lr_y)?;
    }
    writeln!(out, "\t\tProjection=GCTP_{}", kind.gctp_name())?;

    match kind {
        ProjectionKind::Utm => writeln!(out, "\t\tZoneCode={}", proj.zone)?,
        ProjectionKind::Geographic => {}
        _ => {
            let params = struct_meta_params(&proj.params, kind);
            let joined = params
                .iter()
                .map(|v| format!("{:.6}", v))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(out, "\t\tProjParams=({})", joined)?;
        }
    }

    if let Some(code) = sphere_code {
        writeln!(out, "\t\tSphereCode={}", code)?;
    }
    writeln!(out, "\t\tDatum={}", proj.datum.name())?;
    out.push_str("\t\tGridOrigin=HDFE_GD_UL\n");

    out.push_str("\t\tGROUP=Dimension\n\t\tEND_GROUP=Dimension\n\t\tGROUP=DataField\n");
    for (field, band) in group.iter().enumerate() {
        let n = field + 1;
        writeln!(out, "\t\t\tOBJECT=DataField_{}", n)?;
        writeln!(out, "\t\t\t\tDataFieldName=\"{}\"", band.name)?;
        writeln!(out, "\t\t\t\tDataType={}", band.data_type.dfnt_name())?;
        out.push_str("\t\t\t\tDimList=(\"YDim\",\"XDim\")\n");
        writeln!(out, "\t\t\tEND_OBJECT=DataField_{}", n)?;
    }
    out.push_str("\t\tEND_GROUP=DataField\n\t\tGROUP=MergedFields\n\t\tEND_GROUP=MergedFields\n");
    writeln!(out, "\tEND_GROUP=GRID_{}", grid_number)
}

/// Bands grouped by exact pixel size, first-appearance order.
fn resolution_groups(bands: &[Band]) -> Vec<Vec<&Band>> {
    let mut groups: Vec<Vec<&Band>> = Vec::new();
    for band in bands {
        match groups
            .iter_mut()
            .find(|g| g[0].pixel_size == band.pixel_size)
        {
            Some(group) => group.push(band),
            None => groups.push(vec![band]),
        }
    }
    groups
}

/// Projection slots with angles packed as DMS.
fn struct_meta_params(params: &[f64; NPROJ_PARAM], kind: ProjectionKind) -> [f64; NPROJ_PARAM] {
    let mut out = *params;
    let angular: &[usize] = match kind {
        ProjectionKind::Albers => &[STD_PARALLEL_1, STD_PARALLEL_2, CENTRAL_MERIDIAN, ORIGIN_LATITUDE],
        ProjectionKind::PolarStereographic => &[CENTRAL_MERIDIAN, ORIGIN_LATITUDE],
        ProjectionKind::Sinusoidal => &[CENTRAL_MERIDIAN],
        ProjectionKind::Geographic | ProjectionKind::Utm => &[],
    };
    for &slot in angular {
        out[slot] = deg_to_dms(params[slot]);
    }
    out
}

/// Shortest of fixed or exponent notation with six significant digits,
/// trailing zeros removed.
fn format_g(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let exponent = value.abs().log10().floor() as i32;
    // Rounding to six digits can carry into the next decade.
    let rounded: f64 = format!("{:.5e}", value).parse().unwrap_or(value);
    let exponent = if rounded.abs() >= 10f64.powi(exponent + 1) {
        exponent + 1
    } else {
        exponent
    };

    if exponent < -4 || exponent >= 6 {
        let formatted = format!("{:.5e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let mantissa = trim_zeros(mantissa);
                let exp: i32 = exp.parse().unwrap_or(exponent);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => formatted,
        }
    } else {
        let decimals = (5 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
