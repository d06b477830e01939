//! Scene-level land/water mask generation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use espa_common::{EspaError, EspaResult};
use geoloc::{GridOrigin, MapCoord, SceneMetadata};
use projection::Datum;
use tracing::{error, info};

use crate::config::MaskConfig;
use crate::shape_mask::{shape_mask_projection, MaskImage, MASK_VALID};

/// One byte per pixel, line-major: [`MASK_VALID`] for land, zero for water.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandWaterMask {
    pub nlines: usize,
    pub nsamps: usize,
    pub data: Vec<u8>,
}

impl LandWaterMask {
    pub fn value_at(&self, line: usize, sample: usize) -> Option<u8> {
        if line >= self.nlines || sample >= self.nsamps {
            return None;
        }
        self.data.get(line * self.nsamps + sample).copied()
    }

    pub fn land_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == MASK_VALID).count()
    }

    /// Share of pixels marked as land, 0.0 for an empty mask.
    pub fn land_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.land_count() as f64 / self.data.len() as f64
    }

    /// Write the mask as raw bytes with no header.
    pub fn write_raw(&self, path: impl AsRef<Path>) -> EspaResult<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| EspaError::io(format!("creating {}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&self.data)
            .and_then(|_| writer.flush())
            .map_err(|e| EspaError::io(format!("writing {}: {}", path.display(), e)))?;

        info!(
            path = %path.display(),
            bytes = self.data.len(),
            "Wrote land/water mask"
        );
        Ok(())
    }
}

/// Rasterize the land/water mask for the representative band of `scene`.
pub fn generate_land_water_mask(
    scene: &SceneMetadata,
    polygon_file: impl AsRef<Path>,
) -> EspaResult<LandWaterMask> {
    generate(scene, polygon_file.as_ref(), false).map_err(|e| {
        error!(function = "generate_land_water_mask", error = %e, "Land/water mask failed");
        e
    })
}

/// [`generate_land_water_mask`] driven by a [`MaskConfig`].
pub fn generate_with_config(scene: &SceneMetadata, config: &MaskConfig) -> EspaResult<LandWaterMask> {
    let result = config
        .validate()
        .map_err(EspaError::Config)
        .and_then(|_| match &config.polygon_file {
            Some(path) => generate(scene, path, config.summary),
            None => Err(EspaError::Config("no polygon file".to_string())),
        });
    result.map_err(|e| {
        error!(function = "generate_with_config", error = %e, "Land/water mask failed");
        e
    })
}

fn generate(scene: &SceneMetadata, polygon_file: &Path, summary: bool) -> EspaResult<LandWaterMask> {
    scene.validate()?;
    if scene.projection.datum == Datum::NoDatum {
        return Err(EspaError::UnsupportedDatum(
            "land/water masks need a datum-referenced projection".to_string(),
        ));
    }

    let band = scene.representative_band()?;
    let proj = scene.projection_params()?;
    let [psx, psy] = band.pixel_size;
    let [mut ul_x, mut ul_y] = scene.projection.ul_corner;
    let [mut lr_x, mut lr_y] = scene.projection.lr_corner;

    // Move both corners to the outer edges of the image.
    match scene.projection.grid_origin {
        GridOrigin::Center => {
            ul_x -= 0.5 * psx;
            ul_y += 0.5 * psy;
            lr_x += 0.5 * psx;
            lr_y -= 0.5 * psy;
        }
        GridOrigin::UpperLeft => {
            lr_x += psx;
            lr_y -= psy;
        }
    }

    let image = MaskImage {
        corners: [
            MapCoord::new(ul_x, ul_y),
            MapCoord::new(lr_x, ul_y),
            MapCoord::new(ul_x, lr_y),
            MapCoord::new(lr_x, lr_y),
        ],
        pixel_size_x: psx,
        pixel_size_y: psy,
        nlines: band.nlines,
        nsamps: band.nsamps,
    };

    if summary {
        info!(
            ul_x,
            ul_y,
            ur_x = lr_x,
            ur_y = ul_y,
            ll_x = ul_x,
            ll_y = lr_y,
            lr_x,
            lr_y,
            pixel_size_x = psx,
            pixel_size_y = psy,
            nlines = band.nlines,
            nsamps = band.nsamps,
            projection = proj.kind.gctp_code(),
            zone = proj.zone,
            spheroid = proj.sphere_code()?.code(),
            "Land/water mask image"
        );
    }

    let data = shape_mask_projection(polygon_file, &image, &proj)?;
    let mask = LandWaterMask {
        nlines: band.nlines,
        nsamps: band.nsamps,
        data,
    };

    info!(
        nlines = mask.nlines,
        nsamps = mask.nsamps,
        land_fraction = mask.land_fraction(),
        "Generated land/water mask"
    );
    Ok(mask)
}
