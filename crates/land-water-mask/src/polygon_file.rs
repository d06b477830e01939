//! Binary polygon file reader and writer.
//!
//! All values are little-endian. The file starts with an index of the
//! top-level polygons:
//!
//! ```text
//! u32 nparents
//! nparents x { u32 id, i64 byte_offset, f64 min_x, max_x, min_y, max_y }
//! u32 0
//! ```
//!
//! followed by the polygon records, depth first:
//!
//! ```text
//! u32 id
//! u32 npoints                  ring vertices without the closing vertex
//! f64 x[npoints], f64 y[npoints]
//! f64 min_x, max_x, min_y, max_y
//! u32 nsegs
//! nsegs x { u32 first_point, u32 last_point, f64 min_x, max_x, min_y, max_y }
//! u32 child marker             id of the first child, or 0
//!   ... child records ..., u32 0   (only when the marker is non-zero)
//! ```
//!
//! Every sibling list, including the top-level one, ends with a `u32 0`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use espa_common::{BoundingBox, EspaError, EspaResult};
use tracing::{debug, error, info, warn};

use crate::polygon::{Polygon, PolygonSegment};

/// Bytes per index entry: id, offset and bounding box.
const INDEX_ENTRY_SIZE: u64 = 4 + 8 + 4 * 8;

/// Bytes per segment descriptor.
const SEGMENT_SIZE: u64 = 4 + 4 + 4 * 8;

/// Fixed bytes per record: id, point count, bbox, segment count and the
/// child marker.
const RECORD_FIXED_SIZE: u64 = 4 + 4 + 4 * 8 + 4 + 4;

/// Bytes of the list terminator.
const TERMINATOR_SIZE: u64 = 4;

/// Deepest child nesting accepted when reading. Real coastlines nest a few
/// levels (continent, lake, island, pond).
pub const MAX_NESTING_DEPTH: usize = 32;

struct IndexEntry {
    id: u32,
    offset: u64,
    bbox: BoundingBox,
}

// ============================================================================
// Loading
// ============================================================================

/// Load every top-level polygon whose bounding box overlaps `query`,
/// together with its full subtree.
pub fn load_polygons<R: Read + Seek>(
    reader: &mut R,
    query: &BoundingBox,
) -> EspaResult<Vec<Polygon>> {
    let index = read_index(reader)?;
    let nparents = index.len();

    let mut forest = Vec::new();
    for entry in index.iter().filter(|e| e.bbox.overlaps(query)) {
        reader.seek(SeekFrom::Start(entry.offset)).map_err(|e| {
            EspaError::io(format!(
                "seeking to polygon {} at offset {}: {}",
                entry.id, entry.offset, e
            ))
        })?;
        match read_polygon(reader, 0)? {
            Some(polygon) => forest.push(polygon),
            None => {
                return Err(EspaError::io(format!(
                    "no polygon record at offset {} for parent {}",
                    entry.offset, entry.id
                )))
            }
        }
    }

    info!(
        parents = nparents,
        selected = forest.len(),
        min_x = query.min_x,
        max_x = query.max_x,
        min_y = query.min_y,
        max_y = query.max_y,
        "Loaded polygons"
    );
    if forest.is_empty() {
        warn!(
            parents = nparents,
            "No polygons overlap the requested area"
        );
    }

    Ok(forest)
}

/// Open `path` and load the polygons overlapping `query`.
pub fn load_polygon_file(path: impl AsRef<Path>, query: &BoundingBox) -> EspaResult<Vec<Polygon>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        error!(
            function = "load_polygon_file",
            path = %path.display(),
            error = %e,
            "Unable to open polygon file"
        );
        EspaError::io(format!("opening {}: {}", path.display(), e))
    })?;
    let mut reader = BufReader::new(file);
    load_polygons(&mut reader, query).map_err(|e| {
        error!(
            function = "load_polygon_file",
            path = %path.display(),
            error = %e,
            "Loading polygon file failed"
        );
        e
    })
}

fn read_index<R: Read>(reader: &mut R) -> EspaResult<Vec<IndexEntry>> {
    let nparents = read_u32(reader, "number of parent polygons")?;
    if nparents == 0 {
        return Err(EspaError::io("polygon file reports no parent polygons"));
    }

    let mut index = Vec::new();
    index.try_reserve_exact(nparents as usize)?;

    for _ in 0..nparents {
        let id = read_u32(reader, "parent id")?;
        if id == 0 {
            break;
        }
        let offset = read_i64(reader, "parent offset")?;
        let offset = u64::try_from(offset).map_err(|_| {
            EspaError::io(format!("negative offset {} for parent {}", offset, id))
        })?;
        let min_x = read_f64(reader, "parent min x")?;
        let max_x = read_f64(reader, "parent max x")?;
        let min_y = read_f64(reader, "parent min y")?;
        let max_y = read_f64(reader, "parent max y")?;
        index.push(IndexEntry {
            id,
            offset,
            bbox: BoundingBox::new(min_x, min_y, max_x, max_y),
        });
    }

    if index.len() < nparents as usize {
        return Err(EspaError::io(format!(
            "number of parents found ({}) doesn't agree with the number reported ({})",
            index.len(),
            nparents
        )));
    }
    if read_u32(reader, "parent index terminator")? != 0 {
        return Err(EspaError::io(format!(
            "more parents found than reported ({})",
            nparents
        )));
    }

    debug!(parents = nparents, "Read polygon index");
    Ok(index)
}

/// Read one record and its children. `None` for a list terminator.
/// Top-level records are at `depth` zero.
fn read_polygon<R: Read>(reader: &mut R, depth: usize) -> EspaResult<Option<Polygon>> {
    let id = read_u32(reader, "polygon id")?;
    if id == 0 {
        return Ok(None);
    }
    if depth > MAX_NESTING_DEPTH {
        return Err(EspaError::io(format!(
            "polygon {} is nested deeper than {} levels",
            id, MAX_NESTING_DEPTH
        )));
    }

    let npoints = read_u32(reader, "number of points")? as usize;
    let mut xs = read_f64_vec(reader, npoints, "x vertices")?;
    let mut ys = read_f64_vec(reader, npoints, "y vertices")?;
    let min_x = read_f64(reader, "min x")?;
    let max_x = read_f64(reader, "max x")?;
    let min_y = read_f64(reader, "min y")?;
    let max_y = read_f64(reader, "max y")?;

    let nsegs = read_u32(reader, "number of segments")? as usize;
    let mut segments = Vec::new();
    segments.try_reserve_exact(nsegs)?;
    for _ in 0..nsegs {
        segments.push(PolygonSegment {
            first_point: read_u32(reader, "segment first point")?,
            last_point: read_u32(reader, "segment last point")?,
            min_x: read_f64(reader, "segment min x")?,
            max_x: read_f64(reader, "segment max x")?,
            min_y: read_f64(reader, "segment min y")?,
            max_y: read_f64(reader, "segment max y")?,
        });
    }

    if let (Some(&x0), Some(&y0)) = (xs.first(), ys.first()) {
        xs.push(x0);
        ys.push(y0);
    }

    let mut children = Vec::new();
    let mut marker = read_u32(reader, "child marker")?;
    while marker != 0 {
        match read_polygon(reader, depth + 1)? {
            Some(child) => {
                marker = child.id;
                children.push(child);
            }
            None => marker = 0,
        }
    }

    Ok(Some(Polygon {
        id,
        xs,
        ys,
        min_x,
        max_x,
        min_y,
        max_y,
        segments,
        children,
    }))
}

fn read_bytes<R: Read, const N: usize>(reader: &mut R, what: &str) -> EspaResult<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|e| EspaError::io(format!("reading {}: {}", what, e)))?;
    Ok(buf)
}

fn read_u32<R: Read>(reader: &mut R, what: &str) -> EspaResult<u32> {
    Ok(u32::from_le_bytes(read_bytes(reader, what)?))
}

fn read_i64<R: Read>(reader: &mut R, what: &str) -> EspaResult<i64> {
    Ok(i64::from_le_bytes(read_bytes(reader, what)?))
}

fn read_f64<R: Read>(reader: &mut R, what: &str) -> EspaResult<f64> {
    Ok(f64::from_le_bytes(read_bytes(reader, what)?))
}

fn read_f64_vec<R: Read>(reader: &mut R, count: usize, what: &str) -> EspaResult<Vec<f64>> {
    let mut values = Vec::new();
    // Room for the closing vertex appended after the read
    values.try_reserve_exact(count + 1)?;
    for _ in 0..count {
        values.push(read_f64(reader, what)?);
    }
    Ok(values)
}

// ============================================================================
// Dumping
// ============================================================================

/// Write `forest` in the polygon file format.
pub fn dump_polygons<W: Write>(writer: &mut W, forest: &[Polygon]) -> EspaResult<()> {
    if forest.is_empty() {
        return Err(EspaError::invalid_geometry(
            "cannot write a polygon file with no parent polygons",
        ));
    }
    let nparents = u32::try_from(forest.len())
        .map_err(|_| EspaError::invalid_geometry("too many parent polygons"))?;

    let header_size = 4 + forest.len() as u64 * INDEX_ENTRY_SIZE + TERMINATOR_SIZE;

    write_u32(writer, nparents)?;
    let mut offset = header_size;
    for polygon in forest {
        write_u32(writer, polygon.id)?;
        write_i64(writer, offset as i64)?;
        write_f64(writer, polygon.min_x)?;
        write_f64(writer, polygon.max_x)?;
        write_f64(writer, polygon.min_y)?;
        write_f64(writer, polygon.max_y)?;
        offset += subtree_size(polygon);
    }
    write_u32(writer, 0)?;

    write_list(writer, forest)?;

    debug!(
        parents = nparents,
        bytes = offset + TERMINATOR_SIZE,
        "Wrote polygon file"
    );
    Ok(())
}

/// Write `forest` to a new file at `path`.
pub fn write_polygon_file(path: impl AsRef<Path>, forest: &[Polygon]) -> EspaResult<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| EspaError::io(format!("creating {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    dump_polygons(&mut writer, forest)?;
    writer
        .flush()
        .map_err(|e| EspaError::io(format!("flushing {}: {}", path.display(), e)))
}

/// Bytes taken by one record, excluding children.
fn record_size(polygon: &Polygon) -> u64 {
    RECORD_FIXED_SIZE
        + 16 * polygon.num_sides() as u64
        + SEGMENT_SIZE * polygon.segments.len() as u64
}

/// Bytes taken by a record and all of its descendants.
fn subtree_size(polygon: &Polygon) -> u64 {
    let mut size = record_size(polygon);
    if !polygon.children.is_empty() {
        size += polygon.children.iter().map(subtree_size).sum::<u64>() + TERMINATOR_SIZE;
    }
    size
}

fn write_list<W: Write>(writer: &mut W, list: &[Polygon]) -> EspaResult<()> {
    for polygon in list {
        polygon.check_ring()?;
        let sides = polygon.num_sides();
        let npoints = u32::try_from(sides).map_err(|_| {
            EspaError::invalid_geometry(format!("polygon {} has too many vertices", polygon.id))
        })?;

        write_u32(writer, polygon.id)?;
        write_u32(writer, npoints)?;
        for &x in &polygon.xs[..sides] {
            write_f64(writer, x)?;
        }
        for &y in &polygon.ys[..sides] {
            write_f64(writer, y)?;
        }
        write_f64(writer, polygon.min_x)?;
        write_f64(writer, polygon.max_x)?;
        write_f64(writer, polygon.min_y)?;
        write_f64(writer, polygon.max_y)?;

        write_u32(writer, polygon.segments.len() as u32)?;
        for seg in &polygon.segments {
            write_u32(writer, seg.first_point)?;
            write_u32(writer, seg.last_point)?;
            write_f64(writer, seg.min_x)?;
            write_f64(writer, seg.max_x)?;
            write_f64(writer, seg.min_y)?;
            write_f64(writer, seg.max_y)?;
        }

        match polygon.children.first() {
            Some(first) => {
                write_u32(writer, first.id)?;
                write_list(writer, &polygon.children)?;
            }
            None => write_u32(writer, 0)?,
        }
    }
    write_u32(writer, 0)
}

fn write_all<W: Write>(writer: &mut W, bytes: &[u8]) -> EspaResult<()> {
    writer
        .write_all(bytes)
        .map_err(|e| EspaError::io(format!("writing polygon file: {}", e)))
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> EspaResult<()> {
    write_all(writer, &value.to_le_bytes())
}

fn write_i64<W: Write>(writer: &mut W, value: i64) -> EspaResult<()> {
    write_all(writer, &value.to_le_bytes())
}

fn write_f64<W: Write>(writer: &mut W, value: f64) -> EspaResult<()> {
    write_all(writer, &value.to_le_bytes())
}

// ============================================================================
// Reduction
// ============================================================================

/// Drop polygons, at every nesting level, whose bounding box lies outside
/// the box spanned by the upper-left and lower-right corners.
///
/// An upper-left x greater than the lower-right x describes a box that
/// wraps across 180 degrees; a polygon is then dropped only when it lies
/// entirely in the gap between the two edges.
pub fn reduce_polygons(
    forest: &mut Vec<Polygon>,
    upper_left_x: f64,
    lower_right_x: f64,
    upper_left_y: f64,
    lower_right_y: f64,
) -> EspaResult<()> {
    if upper_left_y < lower_right_y {
        return Err(EspaError::invalid_geometry(format!(
            "upper left latitude {} is less than lower right latitude {}",
            upper_left_y, lower_right_y
        )));
    }
    let crosses = upper_left_x > lower_right_x;
    reduce_list(
        forest,
        upper_left_x,
        lower_right_x,
        upper_left_y,
        lower_right_y,
        crosses,
    );
    Ok(())
}

fn reduce_list(
    list: &mut Vec<Polygon>,
    ul_x: f64,
    lr_x: f64,
    ul_y: f64,
    lr_y: f64,
    crosses: bool,
) {
    list.retain_mut(|polygon| {
        reduce_list(&mut polygon.children, ul_x, lr_x, ul_y, lr_y, crosses);

        let outside_y = polygon.min_y > ul_y || polygon.max_y < lr_y;
        let outside_x = if crosses {
            polygon.min_x > lr_x && polygon.max_x < ul_x
        } else {
            polygon.min_x > lr_x || polygon.max_x < ul_x
        };
        !(outside_y || outside_x)
    });
}
