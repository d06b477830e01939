//! Polygon forest.
//!
//! Each [`Polygon`] owns its children. A child lies strictly inside its
//! parent and inverts the parent's containment: a lake inside a continent,
//! an island inside that lake, and so on. Coordinates are x = longitude and
//! y = latitude in decimal degrees.

use espa_common::{EspaError, EspaResult};

/// Bounding box over a run of ring edges, used to skip edges that cannot
/// intersect a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonSegment {
    /// Index of the first vertex of the run
    pub first_point: u32,
    /// Index one past the last edge of the run; edges are
    /// `first_point..last_point` and use vertex `i + 1`
    pub last_point: u32,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub id: u32,
    /// Closed ring: the last vertex repeats the first
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub segments: Vec<PolygonSegment>,
    pub children: Vec<Polygon>,
}

impl Polygon {
    /// Build a polygon from a ring of (x, y) vertices.
    ///
    /// The ring is closed if its last vertex does not already repeat the
    /// first. Rings with fewer than three sides are accepted here and
    /// rejected when queried.
    pub fn new(id: u32, ring: &[(f64, f64)]) -> EspaResult<Self> {
        if id == 0 {
            return Err(EspaError::invalid_geometry(
                "polygon id 0 is reserved as a list terminator",
            ));
        }
        let Some(&first) = ring.first() else {
            return Err(EspaError::invalid_geometry(format!(
                "polygon {} has no vertices",
                id
            )));
        };

        let mut xs: Vec<f64> = ring.iter().map(|p| p.0).collect();
        let mut ys: Vec<f64> = ring.iter().map(|p| p.1).collect();
        if ring.len() == 1 || ring[ring.len() - 1] != first {
            xs.push(first.0);
            ys.push(first.1);
        }

        Ok(Self::from_closed(id, xs, ys))
    }

    /// Build from already closed vertex arrays, computing the bounding box.
    pub(crate) fn from_closed(id: u32, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        let (min_x, max_x) = extent(&xs);
        let (min_y, max_y) = extent(&ys);
        Self {
            id,
            xs,
            ys,
            min_x,
            max_x,
            min_y,
            max_y,
            segments: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Split the ring into segments of at most `chunk` sides each.
    /// A `chunk` of zero removes all segments.
    pub fn with_segments(mut self, chunk: usize) -> Self {
        self.segments.clear();
        if chunk == 0 {
            return self;
        }

        let sides = self.num_sides();
        let mut first = 0;
        while first < sides {
            let last = (first + chunk).min(sides);
            let (min_x, max_x) = extent(&self.xs[first..=last]);
            let (min_y, max_y) = extent(&self.ys[first..=last]);
            self.segments.push(PolygonSegment {
                first_point: first as u32,
                last_point: last as u32,
                min_x,
                max_x,
                min_y,
                max_y,
            });
            first = last;
        }
        self
    }

    /// Nest `child` under this polygon.
    pub fn add_child(&mut self, child: Polygon) {
        self.children.push(child);
    }

    /// Builder form of [`Polygon::add_child`].
    pub fn with_child(mut self, child: Polygon) -> Self {
        self.add_child(child);
        self
    }

    /// Number of ring edges.
    pub fn num_sides(&self) -> usize {
        self.xs.len().min(self.ys.len()).saturating_sub(1)
    }

    /// Fails unless `xs` and `ys` hold the same number of vertices.
    pub fn check_ring(&self) -> EspaResult<()> {
        if self.xs.len() != self.ys.len() {
            return Err(EspaError::invalid_geometry(format!(
                "polygon {} has {} x and {} y vertices",
                self.id,
                self.xs.len(),
                self.ys.len()
            )));
        }
        Ok(())
    }

    /// True if the point lies within the polygon's bounding box.
    pub fn bbox_contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Number of polygons in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Polygon::subtree_len).sum::<usize>()
    }
}

/// Total number of polygons in a forest.
pub fn count_polygons(forest: &[Polygon]) -> usize {
    forest.iter().map(Polygon::subtree_len).sum()
}

fn extent(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
