use serde::{Serialize, Deserialize};
use std::ops::RangeInclusive;

/// A row-major grid of ink intensities in [0, 1].
///
/// Both dimensions are always greater than zero.  Every write goes through
/// `set`, which clamps into [0, 1], so a matrix handed from one stage to the
/// next never carries out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl PixelMatrix {
    /// An all-black (all-zero) matrix.
    pub fn zeros(rows: usize, cols: usize) -> PixelMatrix {
        assert!(rows > 0 && cols > 0, "PixelMatrix dimensions must be non-zero ({}x{})", rows, cols);
        PixelMatrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from nested rows, clamping every value into [0, 1].
    ///
    /// Panics on an empty or ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> PixelMatrix {
        assert!(!data.is_empty() && !data[0].is_empty(), "PixelMatrix requires at least one row and column");
        let cols = data[0].len();
        assert!(
            data.iter().all(|row| row.len() == cols),
            "PixelMatrix rows must all have {} columns",
            cols
        );
        PixelMatrix {
            rows: data.len(),
            cols,
            data: data
                .into_iter()
                .map(|row| row.into_iter().map(clamp_unit).collect())
                .collect(),
        }
    }

    /// Builds a `rows × cols` matrix from a flat row-major slice.
    pub fn from_flat(rows: usize, cols: usize, values: &[f64]) -> PixelMatrix {
        assert_eq!(values.len(), rows * cols, "flat buffer does not match {}x{}", rows, cols);
        PixelMatrix::from_data(values.chunks(cols).map(|chunk| chunk.to_vec()).collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = clamp_unit(value);
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    /// Sum of every intensity in column `col`.
    pub fn column_sum(&self, col: usize) -> f64 {
        self.data.iter().map(|row| row[col]).sum()
    }

    /// Copies the rectangle `rows × cols` (both inclusive) into a new matrix.
    pub fn sub_matrix(&self, rows: RangeInclusive<usize>, cols: RangeInclusive<usize>) -> PixelMatrix {
        let data = self.data[rows]
            .iter()
            .map(|row| row[cols.clone()].to_vec())
            .collect();
        PixelMatrix::from_data(data)
    }

    pub fn map<F>(&self, functor: F) -> PixelMatrix
    where
        F: Fn(f64) -> f64,
    {
        PixelMatrix::from_data(
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        )
    }

    /// Row-major copy of every value.
    pub fn flatten(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().flatten().sum()
    }

    /// Mean intensity over all cells.
    pub fn mean(&self) -> f64 {
        self.sum() / (self.rows * self.cols) as f64
    }

    /// Renders the matrix as a grayscale image, `round(v × 255)` per pixel.
    pub fn to_gray_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.cols as u32, self.rows as u32, |x, y| {
            image::Luma([to_byte(self.data[y as usize][x as usize])])
        })
    }
}

/// Encodes an intensity in [0, 1] as a display byte.
pub fn to_byte(value: f64) -> u8 {
    (clamp_unit(value) * 255.0).round() as u8
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clamps_into_unit_range() {
        let mut m = PixelMatrix::zeros(2, 2);
        m.set(0, 0, 1.7);
        m.set(1, 1, -0.3);
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn sub_matrix_is_inclusive() {
        let m = PixelMatrix::from_flat(3, 4, &[
            0.0, 0.1, 0.2, 0.3,
            0.4, 0.5, 0.6, 0.7,
            0.8, 0.9, 1.0, 0.0,
        ]);
        let sub = m.sub_matrix(1..=2, 1..=2);
        assert_eq!((sub.rows(), sub.cols()), (2, 2));
        assert_eq!(sub.flatten(), vec![0.5, 0.6, 0.9, 1.0]);
    }

    #[test]
    fn column_sum_adds_every_row() {
        let m = PixelMatrix::from_flat(2, 2, &[0.25, 1.0, 0.5, 0.0]);
        assert_eq!(m.column_sum(0), 0.75);
        assert_eq!(m.column_sum(1), 1.0);
    }

    #[test]
    fn gray_image_rounds_to_bytes() {
        let m = PixelMatrix::from_flat(1, 3, &[0.0, 0.5, 1.0]);
        let img = m.to_gray_image();
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
        assert_eq!(img.get_pixel(1, 0).0[0], 128);
        assert_eq!(img.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    #[should_panic]
    fn zero_sized_matrix_is_rejected() {
        let _ = PixelMatrix::zeros(0, 28);
    }
}
