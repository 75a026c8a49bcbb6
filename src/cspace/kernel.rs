//! Precomputed Euclidean distance kernels.

/// Square kernel of world-unit distances from its center cell.
///
/// The kernel spans `(1 + 2 * half_width)` cells per side, where
/// `half_width = ceil(max_radius / scale)`. A fixed 3×3 kernel of the same
/// form is kept alongside for neighbor steps during propagation.
///
/// A kernel is tied to the `scale` and `max_radius` it was built with. Use
/// [`DistanceKernel::matches`] before stamping onto a grid.
#[derive(Clone, Debug)]
pub struct DistanceKernel {
    scale: f32,
    max_radius: f32,
    half_width: i32,
    weights: Vec<f32>,
    local: [f32; 9],
}

impl DistanceKernel {
    /// Build the kernels for a grid scale and obstacle radius.
    pub fn new(scale: f32, max_radius: f32) -> Self {
        let half_width = (max_radius / scale).ceil().max(0.0) as i32;
        let side = (2 * half_width + 1) as usize;

        let mut weights = Vec::with_capacity(side * side);
        for dj in -half_width..=half_width {
            for di in -half_width..=half_width {
                weights.push(offset_distance(di, dj, scale));
            }
        }

        let mut local = [0.0; 9];
        for dj in -1..=1 {
            for di in -1..=1 {
                local[((dj + 1) * 3 + (di + 1)) as usize] = offset_distance(di, dj, scale);
            }
        }

        Self {
            scale,
            max_radius,
            half_width,
            weights,
            local,
        }
    }

    /// Cells from the center to the kernel edge.
    #[inline]
    pub fn half_width(&self) -> i32 {
        self.half_width
    }

    /// Cells per kernel side.
    #[inline]
    pub fn width(&self) -> usize {
        (2 * self.half_width + 1) as usize
    }

    /// Grid scale the kernel was built for.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Obstacle radius the kernel was built for.
    #[inline]
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Distance at offset `(di, dj)`, or `None` outside the kernel.
    #[inline]
    pub fn weight(&self, di: i32, dj: i32) -> Option<f32> {
        let h = self.half_width;
        if di.abs() > h || dj.abs() > h {
            return None;
        }
        let idx = ((dj + h) as usize) * self.width() + (di + h) as usize;
        Some(self.weights[idx])
    }

    /// Step distance to an 8-neighbor (or the center) from the 3×3 kernel.
    #[inline]
    pub fn local_weight(&self, di: i32, dj: i32) -> Option<f32> {
        if di.abs() > 1 || dj.abs() > 1 {
            return None;
        }
        Some(self.local[((dj + 1) * 3 + (di + 1)) as usize])
    }

    /// Iterate `(di, dj, distance)` over every kernel entry, row by row.
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        let h = self.half_width;
        let side = self.width() as i32;
        self.weights.iter().enumerate().map(move |(idx, &w)| {
            let idx = idx as i32;
            (idx % side - h, idx / side - h, w)
        })
    }

    /// Was this kernel built for the given geometry?
    #[inline]
    pub fn matches(&self, scale: f32, max_radius: f32) -> bool {
        self.scale == scale && self.max_radius == max_radius
    }
}

#[inline]
fn offset_distance(di: i32, dj: i32, scale: f32) -> f32 {
    ((di * di + dj * dj) as f32).sqrt() * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_dimensions() {
        let k = DistanceKernel::new(0.05, 0.5);
        assert_eq!(k.half_width(), 10);
        assert_eq!(k.width(), 21);
        assert_eq!(k.offsets().count(), 21 * 21);

        // Non-integer ratio rounds up
        let k = DistanceKernel::new(1.0, 2.5);
        assert_eq!(k.half_width(), 3);
    }

    #[test]
    fn test_kernel_weights() {
        let k = DistanceKernel::new(0.1, 0.3);
        assert_eq!(k.weight(0, 0), Some(0.0));
        assert_relative_eq!(k.weight(3, 0).unwrap(), 0.3, epsilon = 1e-6);
        assert_relative_eq!(k.weight(-1, 1).unwrap(), 0.1 * 2f32.sqrt(), epsilon = 1e-6);
        assert_eq!(k.weight(4, 0), None);
    }

    #[test]
    fn test_local_kernel() {
        let k = DistanceKernel::new(0.5, 2.0);
        assert_eq!(k.local_weight(0, 0), Some(0.0));
        assert_relative_eq!(k.local_weight(1, 0).unwrap(), 0.5);
        assert_relative_eq!(k.local_weight(-1, -1).unwrap(), 0.5 * 2f32.sqrt());
        assert_eq!(k.local_weight(2, 0), None);
    }

    #[test]
    fn test_offsets_agree_with_weight() {
        let k = DistanceKernel::new(1.0, 2.0);
        for (di, dj, w) in k.offsets() {
            assert_eq!(k.weight(di, dj), Some(w));
        }
    }

    #[test]
    fn test_matches() {
        let k = DistanceKernel::new(0.05, 0.5);
        assert!(k.matches(0.05, 0.5));
        assert!(!k.matches(0.1, 0.5));
        assert!(!k.matches(0.05, 0.4));
    }
}
