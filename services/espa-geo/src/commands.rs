//! Subcommand implementations. Each returns the text to print on stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geoloc::{
    compute_bounds, get_geoloc_info, setup_mapping, write_struct_metadata, GeoCoord, ImgCoord,
    MappingSession, SceneMetadata,
};
use land_water_mask::{generate_with_config, MaskConfig};
use projection::angle::degdms;
use projection::{AngleCheck, AngleCode};
use serde_json::json;
use tracing::info;

fn load_scene(path: &Path) -> Result<SceneMetadata> {
    SceneMetadata::from_file(path).with_context(|| format!("loading scene {}", path.display()))
}

fn open_session(scene: &SceneMetadata) -> Result<MappingSession> {
    let def = get_geoloc_info(scene).context("building geolocation space")?;
    setup_mapping(def).context("setting up image mapping")
}

pub fn bounds(scene_path: &Path) -> Result<String> {
    let scene = load_scene(scene_path)?;
    let session = open_session(&scene)?;
    let size = session.definition().img_size;
    let bounds =
        compute_bounds(&session, size.lines, size.samples).context("computing scene bounds")?;
    Ok(serde_json::to_string_pretty(&bounds)?)
}

pub fn locate(scene_path: &Path, line: f64, sample: f64) -> Result<String> {
    let scene = load_scene(scene_path)?;
    let session = open_session(&scene)?;
    let geo = session
        .from_space(&ImgCoord::new(line, sample))
        .with_context(|| format!("locating line {} sample {}", line, sample))?;

    let out = json!({
        "line": line,
        "sample": sample,
        "lat": geo.lat_degrees(),
        "lon": geo.lon_degrees(),
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn project(scene_path: &Path, lat: f64, lon: f64) -> Result<String> {
    let scene = load_scene(scene_path)?;
    let session = open_session(&scene)?;
    let img = session
        .to_space(&GeoCoord::from_degrees(lon, lat))
        .with_context(|| format!("projecting lat {} lon {}", lat, lon))?;

    let out = json!({
        "lat": lat,
        "lon": lon,
        "line": img.line,
        "sample": img.sample,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn dms(degrees: f64, check: AngleCheck) -> Result<String> {
    let packed = degdms(degrees, AngleCode::Degrees, check)
        .with_context(|| format!("packing {} degrees", degrees))?;
    Ok(serde_json::to_string_pretty(&json!({
        "degrees": degrees,
        "dms": packed,
    }))?)
}

pub fn struct_meta(scene_path: &Path) -> Result<String> {
    let scene = load_scene(scene_path)?;
    write_struct_metadata(&scene).context("writing structural metadata")
}

pub fn mask(
    scene_path: &Path,
    polygons: Option<PathBuf>,
    output: &Path,
    summary: bool,
) -> Result<String> {
    let scene = load_scene(scene_path)?;

    let mut config = MaskConfig::from_env();
    if polygons.is_some() {
        config.polygon_file = polygons;
    }
    config.summary |= summary;

    let mask = generate_with_config(&scene, &config).context("generating land/water mask")?;
    mask.write_raw(output)
        .with_context(|| format!("writing mask to {}", output.display()))?;

    info!(
        output = %output.display(),
        nlines = mask.nlines,
        nsamps = mask.nsamps,
        land_fraction = mask.land_fraction(),
        "Land/water mask complete"
    );

    Ok(serde_json::to_string_pretty(&json!({
        "output": output.display().to_string(),
        "nlines": mask.nlines,
        "nsamps": mask.nsamps,
        "land_fraction": mask.land_fraction(),
    }))?)
}
