//! Point-in-polygon queries.
//!
//! Containment uses the even-odd crossing rule: a ray is cast from the
//! query point and the ring edges it crosses are counted. The plain test
//! casts the ray toward +y. The distance variant casts it along the chosen
//! axis and also reports how far the nearest crossing lies beyond the point,
//! which lets a rasterizer skip samples that cannot change state.

use espa_common::{EspaError, EspaResult};

use crate::polygon::{Polygon, PolygonSegment};

/// Axis along which boundary distance is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Along x (longitude)
    X,
    /// Along y (latitude)
    Y,
}

/// Result of a forest-level distance query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeHit {
    pub inside: bool,
    /// Polygon whose boundary set the reported distance
    pub polygon_id: Option<u32>,
}

fn check_sides(polygon: &Polygon) -> EspaResult<usize> {
    polygon.check_ring()?;
    let sides = polygon.num_sides();
    if sides < 3 {
        return Err(EspaError::invalid_geometry(format!(
            "polygon {} needs at least three sides, has {}",
            polygon.id, sides
        )));
    }
    Ok(sides)
}

/// Edge ranges to test, narrowed by segment boxes when the polygon has
/// them. `skip` decides from a segment's box whether it can be ignored.
fn edge_ranges<'a>(
    polygon: &'a Polygon,
    sides: usize,
    skip: impl Fn(&PolygonSegment) -> bool + 'a,
) -> Box<dyn Iterator<Item = std::ops::Range<usize>> + 'a> {
    if polygon.segments.is_empty() {
        Box::new(std::iter::once(0..sides))
    } else {
        Box::new(
            polygon
                .segments
                .iter()
                .filter(move |seg| !skip(seg))
                .map(move |seg| {
                    (seg.first_point as usize).min(sides)..(seg.last_point as usize).min(sides)
                }),
        )
    }
}

/// True if (x, y) lies inside the ring of `polygon`. Children are ignored.
pub fn point_in_closed_polygon(polygon: &Polygon, x: f64, y: f64) -> EspaResult<bool> {
    let sides = check_sides(polygon)?;
    let (vx, vy) = (&polygon.xs, &polygon.ys);

    let ranges = edge_ranges(polygon, sides, move |seg| {
        seg.min_x > x || seg.max_x < x || seg.max_y < y
    });

    let mut inside = false;
    for range in ranges {
        for i in range {
            if (vx[i] > x) != (vx[i + 1] > x)
                && y < (vy[i + 1] - vy[i]) * (x - vx[i]) / (vx[i + 1] - vx[i]) + vy[i]
            {
                inside = !inside;
            }
        }
    }
    Ok(inside)
}

/// Containment of (x, y) in the ring of `polygon`, plus the distance from
/// the point to the nearest edge crossing in the positive `direction`.
///
/// The distance is `None` when the ray crosses no edge.
pub fn point_in_closed_polygon_distance(
    polygon: &Polygon,
    x: f64,
    y: f64,
    direction: Direction,
) -> EspaResult<(bool, Option<f64>)> {
    let sides = check_sides(polygon)?;

    // The crossing test runs along the second axis; swap so that axis is
    // the requested direction.
    let (ax, ay, px, py) = match direction {
        Direction::Y => (&polygon.xs, &polygon.ys, x, y),
        Direction::X => (&polygon.ys, &polygon.xs, y, x),
    };

    let ranges = edge_ranges(polygon, sides, move |seg| match direction {
        Direction::X => seg.min_y > y || seg.max_y < y || seg.max_x < x,
        Direction::Y => seg.min_x > x || seg.max_x < x || seg.max_y < y,
    });

    let mut inside = false;
    let mut nearest: Option<f64> = None;
    for range in ranges {
        for i in range {
            if (ax[i] > px) == (ax[i + 1] > px) {
                continue;
            }
            let distance =
                (ay[i + 1] - ay[i]) * (px - ax[i]) / (ax[i + 1] - ax[i]) + ay[i] - py;
            if distance <= 0.0 {
                continue;
            }
            inside = !inside;
            if nearest.map_or(true, |d| d > distance) {
                nearest = Some(distance);
            }
        }
    }
    Ok((inside, nearest))
}

/// True if the point lies inside any polygon of the forest, with children
/// acting as holes.
///
/// The first top-level polygon that contains the point decides the answer,
/// so overlapping siblings resolve in list order.
pub fn point_in_shape(forest: &[Polygon], latitude: f64, longitude: f64) -> EspaResult<bool> {
    for polygon in forest {
        if !polygon.bbox_contains(longitude, latitude) {
            continue;
        }
        if point_in_closed_polygon(polygon, longitude, latitude)? {
            if polygon.children.is_empty() {
                return Ok(true);
            }
            return Ok(!point_in_shape(&polygon.children, latitude, longitude)?);
        }
    }
    Ok(false)
}

/// [`point_in_shape`] that also tracks the distance to the nearest polygon
/// boundary along `direction`.
///
/// `distance` is a running minimum supplied by the caller. Polygons whose
/// box starts farther away than the current minimum are skipped, and the
/// minimum is lowered whenever a closer boundary is crossed. On a hit it is
/// replaced by the hit polygon's own boundary distance, or a child's when
/// the child boundary is closer.
pub fn point_in_shape_distance(
    forest: &[Polygon],
    latitude: f64,
    longitude: f64,
    direction: Direction,
    distance: &mut f64,
) -> EspaResult<ShapeHit> {
    let mut hit = ShapeHit {
        inside: false,
        polygon_id: None,
    };

    for polygon in forest {
        if polygon.min_y > latitude
            || polygon.max_y < latitude
            || polygon.max_x < longitude
            || polygon.min_x > longitude + *distance
        {
            continue;
        }

        let (inside, hit_distance) =
            point_in_closed_polygon_distance(polygon, longitude, latitude, direction)?;
        let hit_distance = hit_distance.unwrap_or(-1.0);

        if inside {
            hit.polygon_id = Some(polygon.id);
            *distance = hit_distance;

            if !polygon.children.is_empty() {
                let mut child_distance = hit_distance;
                let child = point_in_shape_distance(
                    &polygon.children,
                    latitude,
                    longitude,
                    direction,
                    &mut child_distance,
                )?;
                if child.inside || (child_distance > 0.0 && child_distance < *distance) {
                    hit.polygon_id = child.polygon_id;
                    *distance = child_distance;
                    if child.inside {
                        return Ok(hit);
                    }
                }
            }

            hit.inside = true;
            return Ok(hit);
        } else if hit_distance > 0.0 && hit_distance < *distance {
            hit.polygon_id = Some(polygon.id);
            *distance = hit_distance;
        }
    }

    Ok(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{dense_rectangle_ring, square_ring};

    fn square(id: u32, x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(id, &square_ring(x, y, size)).unwrap()
    }

    #[test]
    fn test_degenerate_ring() {
        let line = Polygon::new(1, &[(0.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(matches!(
            point_in_closed_polygon(&line, 0.5, 0.5),
            Err(EspaError::InvalidGeometry(_))
        ));
        assert!(point_in_closed_polygon_distance(&line, 0.5, 0.5, Direction::X).is_err());
    }

    #[test]
    fn test_mismatched_vertex_arrays() {
        let mut poly = square(1, 0.0, 0.0, 10.0);
        poly.ys.pop();
        assert!(matches!(
            point_in_closed_polygon(&poly, 5.0, 5.0),
            Err(EspaError::InvalidGeometry(_))
        ));
        assert!(point_in_closed_polygon_distance(&poly, 5.0, 5.0, Direction::Y).is_err());

        let mut forest = vec![square(2, 0.0, 0.0, 10.0)];
        forest[0].xs.push(0.0);
        let mut distance = 1e10;
        assert!(point_in_shape(&forest, 5.0, 5.0).is_err());
        assert!(point_in_shape_distance(&forest, 5.0, 5.0, Direction::X, &mut distance).is_err());
    }

    #[test]
    fn test_square_membership() {
        let poly = square(1, 0.0, 0.0, 10.0);
        assert!(point_in_closed_polygon(&poly, 5.0, 5.0).unwrap());
        assert!(point_in_closed_polygon(&poly, 0.5, 9.5).unwrap());
        assert!(!point_in_closed_polygon(&poly, 10.5, 5.0).unwrap());
        assert!(!point_in_closed_polygon(&poly, -3.0, -3.0).unwrap());
    }

    #[test]
    fn test_segments_do_not_change_answer() {
        let plain = Polygon::new(1, &dense_rectangle_ring(0.0, 0.0, 8.0, 4.0, 6)).unwrap();
        let split = plain.clone().with_segments(5);
        for &(x, y) in &[(1.0, 1.0), (7.9, 3.9), (8.1, 2.0), (4.0, -0.1), (3.3, 4.2)] {
            assert_eq!(
                point_in_closed_polygon(&plain, x, y).unwrap(),
                point_in_closed_polygon(&split, x, y).unwrap(),
                "({}, {})",
                x,
                y
            );
            assert_eq!(
                point_in_closed_polygon_distance(&plain, x, y, Direction::X).unwrap(),
                point_in_closed_polygon_distance(&split, x, y, Direction::X).unwrap(),
            );
        }
    }

    #[test]
    fn test_distance_along_x() {
        let poly = square(1, 0.0, 0.0, 10.0);
        let (inside, distance) = point_in_closed_polygon_distance(&poly, 2.0, 5.0, Direction::X).unwrap();
        assert!(inside);
        assert!((distance.unwrap() - 8.0).abs() < 1e-12);

        let (inside, distance) = point_in_closed_polygon_distance(&poly, -4.0, 5.0, Direction::X).unwrap();
        assert!(!inside);
        assert!((distance.unwrap() - 4.0).abs() < 1e-12);

        let (_, distance) = point_in_closed_polygon_distance(&poly, 12.0, 5.0, Direction::X).unwrap();
        assert_eq!(distance, None);
    }

    #[test]
    fn test_distance_along_y() {
        let poly = square(1, 0.0, 0.0, 10.0);
        let (inside, distance) = point_in_closed_polygon_distance(&poly, 5.0, 1.0, Direction::Y).unwrap();
        assert!(inside);
        assert!((distance.unwrap() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_distance_reports_hole_edge() {
        let land = square(1, 0.0, 0.0, 10.0).with_child(square(2, 4.0, 4.0, 2.0));
        let forest = vec![land];

        let mut distance = 1e10;
        let hit = point_in_shape_distance(&forest, 5.0, 1.0, Direction::X, &mut distance).unwrap();
        assert!(hit.inside);
        assert_eq!(hit.polygon_id, Some(2));
        assert!((distance - 3.0).abs() < 1e-12);

        let mut distance = 1e10;
        let hit = point_in_shape_distance(&forest, 5.0, 5.0, Direction::X, &mut distance).unwrap();
        assert!(!hit.inside);
        assert!((distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_distance_outside_everything() {
        let forest = vec![square(1, 0.0, 0.0, 10.0), square(2, 20.0, 0.0, 5.0)];
        let mut distance = 1e10;
        let hit = point_in_shape_distance(&forest, 2.0, -5.0, Direction::X, &mut distance).unwrap();
        assert!(!hit.inside);
        assert_eq!(hit.polygon_id, Some(1));
        assert!((distance - 5.0).abs() < 1e-12);
    }
}
