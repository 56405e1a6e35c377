use crate::config::ContrastConfig;
use crate::error::{Error, Result};
use crate::math::matrix::PixelMatrix;
use crate::sample::CanonicalSample;

/// Output of `ContrastNormalizer`: the intensities plus a display copy.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub pixels: PixelMatrix,
    /// `round(v × 255)` of every value in `pixels`.
    pub preview: image::GrayImage,
}

impl NormalizedImage {
    pub fn into_sample(self) -> CanonicalSample {
        CanonicalSample::new(self.pixels)
    }
}

/// Turns dark-ink-on-light-paper grayscale bytes into clean ink intensities.
///
/// Steps, per pixel:
/// 1. invert and scale to [0, 1]
/// 2. binarize at `threshold`
/// 3. convolve with the feather kernel (zero-padded)
/// 4. remap: below `floor` → 0, above `threshold` → 1, linear in between
#[derive(Debug, Clone, Default)]
pub struct ContrastNormalizer {
    config: ContrastConfig,
}

impl ContrastNormalizer {
    pub fn new(config: ContrastConfig) -> ContrastNormalizer {
        ContrastNormalizer { config }
    }

    pub fn config(&self) -> &ContrastConfig {
        &self.config
    }

    /// Normalizes a `size × size` buffer as produced by the photo decoder.
    pub fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage> {
        self.normalize_buffer(bytes, self.config.size, self.config.size)
    }

    /// Normalizes a row-major buffer of arbitrary dimensions, e.g. a wide
    /// multi-digit scan.
    pub fn normalize_buffer(&self, bytes: &[u8], width: usize, height: usize) -> Result<NormalizedImage> {
        if width == 0 || height == 0 || bytes.len() != width * height {
            return Err(Error::BufferSize { width, height, actual: bytes.len() });
        }
        let threshold = self.config.threshold;

        let binary: Vec<f64> = bytes
            .iter()
            .map(|&p| {
                let inverted = (255 - p) as f64 / 255.0;
                if inverted > threshold { 1.0 } else { 0.0 }
            })
            .collect();
        let binary = PixelMatrix::from_flat(height, width, &binary);

        let feathered = self.config.kernel.convolve(&binary);
        let pixels = feathered.map(|v| remap(v, self.config.floor, threshold));
        let preview = pixels.to_gray_image();

        Ok(NormalizedImage { pixels, preview })
    }
}

/// Piecewise-linear contrast stretch between `floor` and `threshold`.
pub fn remap(value: f64, floor: f64, threshold: f64) -> f64 {
    if value < floor {
        0.0
    } else if value > threshold {
        1.0
    } else {
        ((value - floor) / (threshold - floor)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// White paper with a dark rectangle at rows 8..20, cols 11..17.
    fn paper_with_bar() -> Vec<u8> {
        let mut bytes = vec![250u8; 28 * 28];
        for row in 8..20 {
            for col in 11..17 {
                bytes[row * 28 + col] = 20;
            }
        }
        bytes
    }

    #[test]
    fn remap_knees() {
        assert_eq!(remap(0.04, 0.05, 0.35), 0.0);
        assert_eq!(remap(0.36, 0.05, 0.35), 1.0);
        assert_relative_eq!(remap(0.20, 0.05, 0.35), 0.5, epsilon = 1e-12);
        assert_eq!(remap(0.05, 0.05, 0.35), 0.0);
        assert_relative_eq!(remap(0.35, 0.05, 0.35), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn blank_paper_has_no_ink() {
        let out = ContrastNormalizer::default().normalize(&vec![255u8; 28 * 28]).unwrap();
        assert_eq!(out.pixels.sum(), 0.0);
        assert!(out.preview.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn dark_bar_becomes_solid_ink_with_soft_halo() {
        let out = ContrastNormalizer::default().normalize(&paper_with_bar()).unwrap();
        let m = &out.pixels;
        assert_eq!(m.get(12, 13), 1.0);
        assert_eq!(m.get(8, 11), 1.0);
        // Edge neighbour: one 0.05 edge and two 0.02 diagonals → (0.09 - 0.05) / 0.30.
        assert_relative_eq!(m.get(12, 10), 0.04 / 0.30, epsilon = 1e-9);
        // Outside corner only sees a single diagonal, below the floor.
        assert_eq!(m.get(7, 10), 0.0);
        assert_eq!(m.get(2, 2), 0.0);
    }

    #[test]
    fn preview_matches_intensities() {
        let out = ContrastNormalizer::default().normalize(&paper_with_bar()).unwrap();
        for (x, y, p) in out.preview.enumerate_pixels() {
            let v = out.pixels.get(y as usize, x as usize);
            assert_eq!(p.0[0], (v * 255.0).round() as u8);
        }
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let normalizer = ContrastNormalizer::default();
        let a = normalizer.normalize(&paper_with_bar()).unwrap();
        let b = normalizer.normalize(&paper_with_bar()).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn wide_buffers_keep_their_shape() {
        let bytes = vec![255u8; 28 * 64];
        let out = ContrastNormalizer::default().normalize_buffer(&bytes, 64, 28).unwrap();
        assert_eq!((out.pixels.rows(), out.pixels.cols()), (28, 64));
        assert_eq!(out.preview.dimensions(), (64, 28));
    }

    #[test]
    fn wrong_buffer_length_is_an_error() {
        let err = ContrastNormalizer::default().normalize(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, Error::BufferSize { width: 28, height: 28, actual: 10 }));
    }
}
