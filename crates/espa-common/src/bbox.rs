//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

/// A bounding box in map or geographic coordinates.
///
/// For geographic extents x is longitude and y is latitude, both in degrees.
/// Edges are inclusive: a box touching another along an edge overlaps it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box enclosing every point, or `None` for an empty slice.
    pub fn from_points(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let mut points = xs.iter().zip(ys.iter());
        let (&x0, &y0) = points.next()?;
        let mut bbox = Self::new(x0, y0, x0, y0);
        for (&x, &y) in points {
            bbox.expand_to(x, y);
        }
        Some(bbox)
    }

    /// Grow the box so that it includes (x, y).
    pub fn expand_to(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bbox overlaps another, edges included.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.min_x > other.max_x
            || self.max_x < other.min_x
            || self.min_y > other.max_y
            || self.max_y < other.min_y)
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}
