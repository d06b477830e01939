//! Polygon rasterization.
//!
//! Masking runs in two passes. [`shape_mask`] rasterizes the polygons onto a
//! regular latitude/longitude grid as a [`BitMask`]. [`shape_mask_projection`]
//! builds that grid over the geographic extent of a projected image, then
//! maps every image pixel into it. Image pixels are handled in 20x20 blocks:
//! a block whose footprint covers uniform bitmask cells is filled at once,
//! anything else is resolved pixel by pixel.

use std::ops::Range;
use std::path::Path;

use espa_common::{BoundingBox, EspaError, EspaResult};
use geoloc::MapCoord;
use projection::angle::{add_once_around, crosses_180};
use projection::{AngleUnit, ProjTransformation, ProjectionParams};
use tracing::{debug, error, info};

use crate::bitmask::BitMask;
use crate::containment::{point_in_shape_distance, Direction};
use crate::polygon::Polygon;
use crate::polygon_file::{load_polygon_file, reduce_polygons};

/// Edge length of the pixel blocks tested for uniform coverage.
pub const GRID_SIZE: usize = 20;

/// Output value for land pixels. Water is zero.
pub const MASK_VALID: u8 = 1;

/// Starting distance for each boundary search.
const FAR_AWAY: f64 = 1e10;

// ============================================================================
// Geographic grid
// ============================================================================

/// Rasterize the polygons of `polygon_file` onto an `nlines` x `nsamps`
/// latitude/longitude grid.
///
/// Line `l` sits at latitude `ul_lat - l * (ul_lat - lr_lat) / nlines` and
/// sample `s` at longitude `ul_lon + s * (lr_lon - ul_lon) / nsamps`. A grid
/// spanning the antimeridian is given either as `ul_lon > lr_lon` or with
/// `lr_lon` past 180.
pub fn shape_mask(
    polygon_file: impl AsRef<Path>,
    nlines: usize,
    nsamps: usize,
    ul_lat: f64,
    lr_lat: f64,
    ul_lon: f64,
    lr_lon: f64,
) -> EspaResult<BitMask> {
    check_dimensions(nlines, nsamps)?;
    if ul_lat < lr_lat {
        return Err(EspaError::invalid_geometry(format!(
            "upper left latitude {} is south of lower right latitude {}",
            ul_lat, lr_lat
        )));
    }

    let wraps = ul_lon > lr_lon || lr_lon > 180.0;
    let query = if wraps {
        BoundingBox::new(-180.0, lr_lat, 180.0, ul_lat)
    } else {
        BoundingBox::new(ul_lon, lr_lat, lr_lon, ul_lat)
    };
    let mut forest = load_polygon_file(polygon_file, &query)?;

    let wrapped_lr_lon = if lr_lon > 180.0 { lr_lon - 360.0 } else { lr_lon };
    reduce_polygons(&mut forest, ul_lon, wrapped_lr_lon, ul_lat, lr_lat)?;
    debug!(
        polygons = crate::polygon::count_polygons(&forest),
        wraps,
        "Polygons reduced to grid extent"
    );

    rasterize(&forest, nlines, nsamps, ul_lat, lr_lat, ul_lon, lr_lon)
}

fn rasterize(
    forest: &[Polygon],
    nlines: usize,
    nsamps: usize,
    ul_lat: f64,
    lr_lat: f64,
    ul_lon: f64,
    lr_lon: f64,
) -> EspaResult<BitMask> {
    let mut mask = BitMask::new(nlines, nsamps)?;

    let delta_lat = (ul_lat - lr_lat) / nlines as f64;
    let mut span_lon = lr_lon - ul_lon;
    if lr_lon < ul_lon {
        span_lon += 360.0;
    }
    let delta_lon = span_lon / nsamps as f64;

    for line in 0..nlines {
        let lat = ul_lat - delta_lat * line as f64;
        let mut sample = 0;
        while sample < nsamps {
            let mut lon = ul_lon + delta_lon * sample as f64;
            if lon >= 180.0 {
                lon -= 360.0;
            }

            let mut distance = FAR_AWAY;
            let hit = point_in_shape_distance(forest, lat, lon, Direction::X, &mut distance)?;

            // Boundaries past the antimeridian are invisible from here.
            let until_wrap = 180.0 - lon;
            if ul_lon + span_lon > 180.0 && distance > until_wrap {
                distance = until_wrap;
            }

            // Every sample before the next boundary shares this answer.
            loop {
                if hit.inside {
                    mask.set(line, sample);
                }
                sample += 1;
                distance -= delta_lon;
                if sample >= nsamps || distance <= 0.0 {
                    break;
                }
            }
        }
    }

    Ok(mask)
}

// ============================================================================
// Projected image
// ============================================================================

/// Placement of a projected image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskImage {
    /// Outer corners in map units: upper left, upper right, lower left,
    /// lower right
    pub corners: [MapCoord; 4],
    pub pixel_size_x: f64,
    pub pixel_size_y: f64,
    pub nlines: usize,
    pub nsamps: usize,
}

impl MaskImage {
    fn upper_left(&self) -> MapCoord {
        self.corners[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMaskOptions {
    /// Fill blocks with uniform coverage without visiting each pixel
    pub fast_path: bool,
}

impl Default for ShapeMaskOptions {
    fn default() -> Self {
        Self { fast_path: true }
    }
}

/// Land/water mask for a projected image, one byte per pixel:
/// [`MASK_VALID`] for land, zero for water.
pub fn shape_mask_projection(
    polygon_file: impl AsRef<Path>,
    image: &MaskImage,
    proj: &ProjectionParams,
) -> EspaResult<Vec<u8>> {
    shape_mask_projection_with_options(polygon_file, image, proj, ShapeMaskOptions::default())
}

pub fn shape_mask_projection_with_options(
    polygon_file: impl AsRef<Path>,
    image: &MaskImage,
    proj: &ProjectionParams,
    options: ShapeMaskOptions,
) -> EspaResult<Vec<u8>> {
    project_mask(polygon_file.as_ref(), image, proj, options)
        .map(|(mask, _)| mask)
        .map_err(|e| {
            error!(function = "shape_mask_projection", error = %e, "Projected mask failed");
            e
        })
}

/// How the blocks of a projected mask were resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BlockCounts {
    uniform: usize,
    per_pixel: usize,
}

fn project_mask(
    polygon_file: &Path,
    image: &MaskImage,
    proj: &ProjectionParams,
    options: ShapeMaskOptions,
) -> EspaResult<(Vec<u8>, BlockCounts)> {
    let (nlines, nsamps) = (image.nlines, image.nsamps);
    check_dimensions(nlines, nsamps)?;

    let to_geo = ProjTransformation::to_geographic(proj)?;

    let mut lons = [0.0; 4];
    let mut lats = [0.0; 4];
    for (i, corner) in image.corners.iter().enumerate() {
        let (lon, lat) = to_geo.transform(corner.x, corner.y)?;
        lons[i] = lon;
        lats[i] = lat;
    }

    let crosses = crosses_180(AngleUnit::Degrees, &lons);
    if crosses {
        for lon in lons.iter_mut().filter(|lon| **lon < 0.0) {
            *lon = add_once_around(AngleUnit::Degrees, *lon)?;
        }
    }

    let min_lat = lats.iter().copied().fold(f64::INFINITY, f64::min);
    let max_lat = lats.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_lon = lons.iter().copied().fold(f64::INFINITY, f64::min);
    let max_lon = lons.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    info!(
        nlines,
        nsamps,
        min_lat,
        max_lat,
        min_lon,
        max_lon,
        crosses_180 = crosses,
        "Rasterizing land mask"
    );

    let bitmask = shape_mask(
        polygon_file,
        nlines,
        nsamps,
        max_lat,
        min_lat,
        min_lon,
        max_lon,
    )?;

    let grid = GeoGrid {
        to_geo,
        crosses,
        max_lat,
        min_lon,
        delta_lat: (max_lat - min_lat) / nlines as f64,
        delta_lon: (max_lon - min_lon) / nsamps as f64,
        nlines,
        nsamps,
    };

    let len = nlines * nsamps;
    let mut mask = Vec::new();
    mask.try_reserve_exact(len)?;
    mask.resize(len, 0u8);

    let mut counts = BlockCounts::default();

    for v in 0..=nlines / GRID_SIZE {
        let block_lines = block_len(v, nlines);
        if block_lines == 0 {
            continue;
        }
        for h in 0..=nsamps / GRID_SIZE {
            let block_samps = block_len(h, nsamps);
            if block_samps == 0 {
                continue;
            }
            let lines = v * GRID_SIZE..v * GRID_SIZE + block_lines;
            let samples = h * GRID_SIZE..h * GRID_SIZE + block_samps;

            if options.fast_path {
                if let Some(land) = uniform_value(&grid, &bitmask, image, &lines, &samples)? {
                    counts.uniform += 1;
                    if land {
                        for line in lines {
                            mask[line * nsamps + samples.start..line * nsamps + samples.end]
                                .fill(MASK_VALID);
                        }
                    }
                    continue;
                }
            }

            counts.per_pixel += 1;
            fill_pixels(&grid, &bitmask, image, lines, samples, &mut mask)?;
        }
    }

    debug!(
        uniform_blocks = counts.uniform,
        pixel_blocks = counts.per_pixel,
        "Land mask blocks resolved"
    );
    Ok((mask, counts))
}

fn check_dimensions(nlines: usize, nsamps: usize) -> EspaResult<()> {
    if nlines == 0 || nsamps == 0 {
        return Err(EspaError::invalid_parameter(
            "dimensions",
            format!("{} lines by {} samples is empty", nlines, nsamps),
        ));
    }
    Ok(())
}

/// Length of block `index` along an axis of `extent` pixels.
fn block_len(index: usize, extent: usize) -> usize {
    if index == extent / GRID_SIZE {
        extent % GRID_SIZE
    } else {
        GRID_SIZE
    }
}

/// The latitude/longitude grid the bitmask was rasterized on.
struct GeoGrid {
    to_geo: ProjTransformation,
    crosses: bool,
    max_lat: f64,
    min_lon: f64,
    delta_lat: f64,
    delta_lon: f64,
    nlines: usize,
    nsamps: usize,
}

impl GeoGrid {
    /// Fractional (line, sample) of a map coordinate in the bitmask, or
    /// `None` when it falls outside.
    fn locate(&self, x: f64, y: f64) -> EspaResult<Option<(f64, f64)>> {
        let (mut lon, lat) = self.to_geo.transform(x, y)?;
        if self.crosses && lon < 0.0 {
            lon += 360.0;
        }
        let sample = (lon - self.min_lon) / self.delta_lon;
        let line = (self.max_lat - lat) / self.delta_lat;

        let inside = line >= 0.0
            && line < self.nlines as f64
            && sample >= 0.0
            && sample < self.nsamps as f64;
        Ok(inside.then_some((line, sample)))
    }
}

/// Land (`true`) or water (`false`) when every bitmask cell a block's
/// pixels can round to agrees, `None` when the block must be resolved per
/// pixel.
///
/// The cells checked run from the floor of the footprint minimum through
/// one past the floor of its maximum, covering any rounding up.
fn uniform_value(
    grid: &GeoGrid,
    bitmask: &BitMask,
    image: &MaskImage,
    lines: &Range<usize>,
    samples: &Range<usize>,
) -> EspaResult<Option<bool>> {
    let ul = image.upper_left();
    let x0 = ul.x + samples.start as f64 * image.pixel_size_x;
    let y0 = ul.y - lines.start as f64 * image.pixel_size_y;
    let x1 = x0 + samples.len() as f64 * image.pixel_size_x;
    let y1 = y0 - lines.len() as f64 * image.pixel_size_y;

    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (x, y) in [(x0, y0), (x0, y1), (x1, y0), (x1, y1)] {
        let Some((line, sample)) = grid.locate(x, y)? else {
            return Ok(None);
        };
        min = (min.0.min(line), min.1.min(sample));
        max = (max.0.max(line), max.1.max(sample));
    }

    let (min_line, min_samp) = (min.0 as usize, min.1 as usize);
    let (max_line, max_samp) = ((max.0 + 1.0) as usize, (max.1 + 1.0) as usize);
    if max_line >= grid.nlines || max_samp >= grid.nsamps {
        return Ok(None);
    }

    let land = bitmask.get(min_line, min_samp);
    for line in min_line..=max_line {
        for sample in min_samp..=max_samp {
            if bitmask.get(line, sample) != land {
                return Ok(None);
            }
        }
    }
    Ok(Some(land))
}

/// Resolve each pixel of a block from its nearest bitmask cell.
fn fill_pixels(
    grid: &GeoGrid,
    bitmask: &BitMask,
    image: &MaskImage,
    lines: Range<usize>,
    samples: Range<usize>,
    mask: &mut [u8],
) -> EspaResult<()> {
    let ul = image.upper_left();
    for line in lines {
        let y = ul.y - line as f64 * image.pixel_size_y;
        for sample in samples.clone() {
            let x = ul.x + sample as f64 * image.pixel_size_x;
            let Some((grid_line, grid_samp)) = grid.locate(x, y)? else {
                continue;
            };
            let grid_line = (grid_line.round() as usize).min(grid.nlines - 1);
            let grid_samp = (grid_samp.round() as usize).min(grid.nsamps - 1);
            if bitmask.get(grid_line, grid_samp) {
                mask[line * grid.nsamps + sample] = MASK_VALID;
            }
        }
    }
    Ok(())
}
