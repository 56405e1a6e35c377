use crate::config::StrokeConfig;
use crate::math::kernel::{neighbour, Kernel};
use crate::math::matrix::PixelMatrix;
use crate::sample::CanonicalSample;

/// An ink canvas fed by pointer events from a single drawing session.
///
/// Starts black.  Each `paint` sets one pixel to full ink and brightens its
/// eight neighbours by the feather kernel, which gives strokes a soft edge.
#[derive(Debug, Clone)]
pub struct StrokeRenderer {
    canvas: PixelMatrix,
    kernel: Kernel,
}

impl StrokeRenderer {
    pub fn new(config: &StrokeConfig) -> StrokeRenderer {
        StrokeRenderer {
            canvas: PixelMatrix::zeros(config.height, config.width),
            kernel: config.kernel,
        }
    }

    pub fn width(&self) -> usize {
        self.canvas.cols()
    }

    pub fn height(&self) -> usize {
        self.canvas.rows()
    }

    /// Paints the cell at column `x`, row `y`.  Coordinates outside the
    /// canvas are ignored, as are neighbours that fall off an edge.
    pub fn paint(&mut self, x: usize, y: usize) {
        let (rows, cols) = (self.height(), self.width());
        if x >= cols || y >= rows {
            return;
        }
        self.canvas.set(y, x, 1.0);
        for (dr, dc, weight) in self.kernel.offsets() {
            if dr == 0 && dc == 0 {
                continue;
            }
            if let Some((r, c)) = neighbour(y, x, dr, dc, rows, cols) {
                let raised = self.canvas.get(r, c) + weight;
                self.canvas.set(r, c, raised.min(1.0));
            }
        }
    }

    /// Maps a pointer position on a `surface_width × surface_height` drawing
    /// surface onto a canvas cell and paints it.  Positions past any edge
    /// are clamped onto the border cell.
    pub fn paint_at_pointer(&mut self, px: i32, py: i32, surface_width: u32, surface_height: u32) {
        let cell_w = (surface_width as usize / self.width()).max(1);
        let cell_h = (surface_height as usize / self.height()).max(1);
        let x = (px.max(0) as usize / cell_w).min(self.width() - 1);
        let y = (py.max(0) as usize / cell_h).min(self.height() - 1);
        self.paint(x, y);
    }

    /// Resets every cell to black.
    pub fn clear(&mut self) {
        self.canvas = PixelMatrix::zeros(self.height(), self.width());
    }

    /// An owned copy of the canvas; later strokes do not show up in it.
    pub fn snapshot(&self) -> PixelMatrix {
        self.canvas.clone()
    }

    /// The canvas as an unlabeled sample, ready for the classifier.
    pub fn to_sample(&self) -> CanonicalSample {
        CanonicalSample::new(self.snapshot())
    }

    pub fn preview(&self) -> image::GrayImage {
        self.canvas.to_gray_image()
    }
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        StrokeRenderer::new(&StrokeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn paint_feathers_neighbours() {
        let mut r = StrokeRenderer::default();
        r.paint(10, 5);
        let c = r.snapshot();
        assert_eq!(c.get(5, 10), 1.0);
        assert_relative_eq!(c.get(4, 10), 0.15);
        assert_relative_eq!(c.get(5, 11), 0.15);
        assert_relative_eq!(c.get(6, 11), 0.05);
        assert_eq!(c.get(7, 10), 0.0);
        assert_relative_eq!(c.sum(), 1.0 + 4.0 * 0.15 + 4.0 * 0.05, epsilon = 1e-12);
    }

    #[test]
    fn repeated_paint_saturates_at_one() {
        let mut r = StrokeRenderer::default();
        for _ in 0..10 {
            r.paint(3, 3);
        }
        r.paint(4, 3);
        let c = r.snapshot();
        assert_eq!(c.get(3, 4), 1.0);
        assert_eq!(c.get(3, 3), 1.0);
        assert_relative_eq!(c.get(2, 3), 1.0);
    }

    #[test]
    fn corners_skip_missing_neighbours() {
        let mut r = StrokeRenderer::default();
        r.paint(0, 0);
        r.paint(27, 27);
        let c = r.snapshot();
        assert_eq!((c.rows(), c.cols()), (28, 28));
        assert_eq!(c.get(0, 0), 1.0);
        assert_eq!(c.get(27, 27), 1.0);
        assert_relative_eq!(c.get(1, 1), 0.05);
        assert_relative_eq!(c.get(26, 27), 0.15);
        assert_relative_eq!(c.sum(), 2.0 * (1.0 + 2.0 * 0.15 + 0.05), epsilon = 1e-12);
    }

    #[test]
    fn out_of_canvas_paint_is_ignored() {
        let mut r = StrokeRenderer::default();
        r.paint(28, 3);
        r.paint(3, 100);
        assert_eq!(r.snapshot().sum(), 0.0);
    }

    #[test]
    fn pointer_positions_clamp_to_border() {
        let mut r = StrokeRenderer::default();
        r.paint_at_pointer(-40, 5000, 280, 280);
        let c = r.snapshot();
        assert_eq!(c.get(27, 0), 1.0);

        r.clear();
        r.paint_at_pointer(125, 35, 280, 280);
        assert_eq!(r.snapshot().get(3, 12), 1.0);
    }

    #[test]
    fn snapshot_is_detached_from_canvas() {
        let mut r = StrokeRenderer::default();
        r.paint(5, 5);
        let before = r.snapshot();
        r.paint(20, 20);
        assert_eq!(before.get(20, 20), 0.0);
        r.clear();
        assert_eq!(before.get(5, 5), 1.0);
        assert_eq!(r.snapshot().sum(), 0.0);
    }

    #[test]
    fn random_strokes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut r = StrokeRenderer::default();
        for _ in 0..500 {
            r.paint(rng.gen_range(0..32), rng.gen_range(0..32));
        }
        assert!(r.snapshot().flatten().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
