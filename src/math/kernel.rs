use serde::{Serialize, Deserialize};
use crate::math::matrix::PixelMatrix;

/// A 3×3 grid of non-negative weights, indexed `[row offset + 1][col offset + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kernel(pub [[f64; 3]; 3]);

/// Pen softness applied around every painted canvas pixel.
pub const STROKE_FEATHER: Kernel = Kernel([
    [0.05, 0.15, 0.05],
    [0.15, 0.50, 0.15],
    [0.05, 0.15, 0.05],
]);

/// Smoothing applied to a binarized photo before the contrast remap.
pub const CONTRAST_FEATHER: Kernel = Kernel([
    [0.02, 0.05, 0.02],
    [0.05, 0.76, 0.05],
    [0.02, 0.05, 0.02],
]);

impl Kernel {
    /// Weight for the neighbour at (`dr`, `dc`), each in -1..=1.
    pub fn weight(&self, dr: isize, dc: isize) -> f64 {
        self.0[(dr + 1) as usize][(dc + 1) as usize]
    }

    /// Iterates `(dr, dc, weight)` over all nine cells.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize, f64)> + '_ {
        (-1..=1isize).flat_map(move |dr| (-1..=1isize).map(move |dc| (dr, dc, self.weight(dr, dc))))
    }

    /// Zero-padded convolution: neighbours outside the matrix contribute
    /// nothing.  Results are clamped to at most 1.0 by `PixelMatrix::set`.
    pub fn convolve(&self, input: &PixelMatrix) -> PixelMatrix {
        let (rows, cols) = (input.rows(), input.cols());
        let mut out = PixelMatrix::zeros(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                let sum: f64 = self
                    .offsets()
                    .filter_map(|(dr, dc, w)| {
                        neighbour(row, col, dr, dc, rows, cols).map(|(r, c)| input.get(r, c) * w)
                    })
                    .sum();
                out.set(row, col, sum);
            }
        }
        out
    }
}

/// Resolves `(row + dr, col + dc)` if it lies inside a `rows × cols` grid.
pub(crate) fn neighbour(
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < rows && c < cols).then_some((r, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_pixel_spreads_kernel_weights() {
        let mut m = PixelMatrix::zeros(3, 3);
        m.set(1, 1, 1.0);
        let out = CONTRAST_FEATHER.convolve(&m);
        assert_relative_eq!(out.get(1, 1), 0.76);
        assert_relative_eq!(out.get(0, 1), 0.05);
        assert_relative_eq!(out.get(0, 0), 0.02);
    }

    #[test]
    fn border_neighbours_are_zero_padded() {
        let m = PixelMatrix::from_flat(2, 2, &[1.0; 4]);
        let out = CONTRAST_FEATHER.convolve(&m);
        // Corner pixel sees itself, two edge neighbours and one diagonal.
        assert_relative_eq!(out.get(0, 0), 0.76 + 0.05 + 0.05 + 0.02);
    }

    #[test]
    fn full_ink_is_clamped_to_one() {
        let m = PixelMatrix::from_flat(3, 3, &[1.0; 9]);
        let out = CONTRAST_FEATHER.convolve(&m);
        assert_eq!(out.get(1, 1), 1.0);
    }

    #[test]
    fn neighbour_rejects_out_of_bounds() {
        assert_eq!(neighbour(0, 0, -1, 0, 3, 3), None);
        assert_eq!(neighbour(2, 2, 0, 1, 3, 3), None);
        assert_eq!(neighbour(1, 1, 1, -1, 3, 3), Some((2, 0)));
    }
}
