//! Generators for synthetic polygon rings and masks.
//!
//! Rings are returned as open vertex lists, without the duplicated closing
//! point. Polygon constructors close them.

use std::f64::consts::PI;

/// Axis-aligned rectangle, counter-clockwise from the lower-left corner.
///
/// # Example
///
/// ```
/// use test_utils::rectangle_ring;
///
/// let ring = rectangle_ring(0.0, 0.0, 10.0, 5.0);
/// assert_eq!(ring.len(), 4);
/// assert_eq!(ring[2], (10.0, 5.0));
/// ```
pub fn rectangle_ring(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<(f64, f64)> {
    vec![(min_x, min_y), (max_x, min_y), (max_x, max_y), (min_x, max_y)]
}

/// Square with its lower-left corner at (x, y).
pub fn square_ring(x: f64, y: f64, size: f64) -> Vec<(f64, f64)> {
    rectangle_ring(x, y, x + size, y + size)
}

/// Regular polygon approximating a circle.
///
/// # Arguments
///
/// * `center` - (x, y) of the center
/// * `radius` - Distance from center to each vertex
/// * `sides` - Number of vertices, at least 3
pub fn regular_ring(center: (f64, f64), radius: f64, sides: usize) -> Vec<(f64, f64)> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / sides as f64;
            (center.0 + radius * theta.cos(), center.1 + radius * theta.sin())
        })
        .collect()
}

/// Rectangle whose edges are subdivided so that each side carries
/// `per_side` vertices. Useful for exercising segment descriptors.
pub fn dense_rectangle_ring(
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    per_side: usize,
) -> Vec<(f64, f64)> {
    let n = per_side.max(1);
    let mut ring = Vec::with_capacity(4 * n);
    let corners = [
        (min_x, min_y),
        (max_x, min_y),
        (max_x, max_y),
        (min_x, max_y),
    ];
    for k in 0..4 {
        let (x0, y0) = corners[k];
        let (x1, y1) = corners[(k + 1) % 4];
        for i in 0..n {
            let t = i as f64 / n as f64;
            ring.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
        }
    }
    ring
}

/// Number of non-zero bytes in a byte-per-pixel mask.
pub fn count_set(mask: &[u8]) -> usize {
    mask.iter().filter(|&&v| v != 0).count()
}

/// Number of set bits in a bit-packed mask, looking only at the first
/// `nbits` positions (most significant bit first).
pub fn count_set_bits(bits: &[u8], nbits: usize) -> usize {
    (0..nbits)
        .filter(|&i| bits.get(i / 8).map_or(false, |b| b & (0x80 >> (i % 8)) != 0))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_ring() {
        let ring = square_ring(4.0, 4.0, 2.0);
        assert_eq!(ring, vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);
    }

    #[test]
    fn test_regular_ring_radius() {
        let ring = regular_ring((1.0, -1.0), 3.0, 12);
        assert_eq!(ring.len(), 12);
        for (x, y) in ring {
            let r = ((x - 1.0).powi(2) + (y + 1.0).powi(2)).sqrt();
            assert!((r - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dense_rectangle_ring() {
        let ring = dense_rectangle_ring(0.0, 0.0, 8.0, 4.0, 4);
        assert_eq!(ring.len(), 16);
        assert_eq!(ring[0], (0.0, 0.0));
        assert_eq!(ring[4], (8.0, 0.0));
        assert_eq!(ring[1], (2.0, 0.0));
    }

    #[test]
    fn test_counts() {
        assert_eq!(count_set(&[0, 1, 0, 1, 1]), 3);
        assert_eq!(count_set_bits(&[0b1010_0000, 0xFF], 10), 4);
    }
}
