use image::{imageops, ImageBuffer, Luma};
use crate::config::CanonicalConfig;
use crate::math::matrix::PixelMatrix;
use crate::pipeline::segment::Span;
use crate::sample::CanonicalSample;

type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Crops one span to its inked rows, rescales it to fit inside the margins
/// and centres it on a black `target_size × target_size` canvas.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    config: CanonicalConfig,
}

impl Canonicalizer {
    pub fn new(config: CanonicalConfig) -> Canonicalizer {
        Canonicalizer { config }
    }

    pub fn config(&self) -> &CanonicalConfig {
        &self.config
    }

    /// Canonicalizes the columns of `matrix` covered by `span`.
    pub fn canonicalize(&self, matrix: &PixelMatrix, span: Span) -> CanonicalSample {
        assert!(span.end < matrix.cols(), "span {:?} exceeds matrix width {}", span, matrix.cols());
        let (min_row, max_row) = ink_rows(matrix, span).unwrap_or((0, matrix.rows() - 1));
        let segment = matrix.sub_matrix(min_row..=max_row, span.start..=span.end);
        self.fit(&segment)
    }

    /// Rescales a whole segment into the canonical frame.
    pub fn fit(&self, segment: &PixelMatrix) -> CanonicalSample {
        let (seg_w, seg_h) = (segment.cols(), segment.rows());
        assert!(seg_w > 0 && seg_h > 0, "cannot rescale an empty segment");

        let available = self.config.available_size() as f64;
        let scale = (available / seg_w as f64)
            .min(available / seg_h as f64)
            .max(self.config.min_scale);
        let scaled_w = ((seg_w as f64 * scale).round() as u32).max(1);
        let scaled_h = ((seg_h as f64 * scale).round() as u32).max(1);

        // Ink is resampled at full strength; bilinear edges carry the grading.
        let source = FloatImage::from_fn(seg_w as u32, seg_h as u32, |x, y| {
            let ink = segment.get(y as usize, x as usize) > 0.0;
            Luma([if ink { 1.0 } else { 0.0 }])
        });
        let scaled = imageops::resize(&source, scaled_w, scaled_h, imageops::FilterType::Triangle);

        let target = self.config.target_size;
        let offset_x = (target as i64 - scaled_w as i64) / 2;
        let offset_y = (target as i64 - scaled_h as i64) / 2;

        let mut canvas = PixelMatrix::zeros(target, target);
        for (x, y, pixel) in scaled.enumerate_pixels() {
            let col = offset_x + x as i64;
            let row = offset_y + y as i64;
            if col < 0 || row < 0 || col >= target as i64 || row >= target as i64 {
                continue;
            }
            let value = pixel.0[0] as f64;
            let value = if self.config.binarize {
                if value > 0.0 { 1.0 } else { 0.0 }
            } else {
                value
            };
            canvas.set(row as usize, col as usize, value);
        }
        CanonicalSample::new(canvas)
    }
}

/// First and last rows holding any ink inside the span's columns.
fn ink_rows(matrix: &PixelMatrix, span: Span) -> Option<(usize, usize)> {
    let mut inked = (0..matrix.rows())
        .filter(|&row| matrix.row(row)[span.start..=span.end].iter().any(|&v| v > 0.0));
    let first = inked.next()?;
    let last = inked.last().unwrap_or(first);
    Some((first, last))
}
