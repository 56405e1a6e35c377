use serde::{Serialize, Deserialize};
use crate::config::SegmentConfig;
use crate::math::matrix::PixelMatrix;

/// Inclusive column interval `[start, end]` holding one digit candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        assert!(start <= end, "span start {} is past its end {}", start, end);
        Span { start, end }
    }

    /// The span covering every column of a `width`-wide matrix.
    pub fn full(width: usize) -> Span {
        Span::new(0, width - 1)
    }

    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, col: usize) -> bool {
        (self.start..=self.end).contains(&col)
    }
}

enum ScanState {
    Idle,
    Capturing { start: usize, gap_width: usize },
}

/// Splits a normalized matrix into horizontally adjacent digits by
/// projecting ink onto the x axis.
///
/// A column is active when its sum reaches `gap_threshold_ratio × height`.
/// A run of active columns becomes a span once `min_gap_width` blank columns
/// follow it (or the matrix ends).  Spans narrower than `min_segment_width`
/// are dropped.  When nothing survives the whole width is returned as a
/// single span, so the result is never empty.
#[derive(Debug, Clone, Default)]
pub struct DigitSegmenter {
    config: SegmentConfig,
}

impl DigitSegmenter {
    pub fn new(config: SegmentConfig) -> DigitSegmenter {
        DigitSegmenter { config }
    }

    /// Spans in left-to-right order.
    pub fn find_spans(&self, matrix: &PixelMatrix) -> Vec<Span> {
        let width = matrix.cols();
        let gap_threshold = self.config.gap_threshold_ratio * matrix.rows() as f64;
        let min_gap = self.config.min_gap_width.max(1);

        let mut spans = Vec::new();
        let mut state = ScanState::Idle;

        for col in 0..width {
            let active = matrix.column_sum(col) >= gap_threshold;
            state = match (state, active) {
                (ScanState::Idle, true) => ScanState::Capturing { start: col, gap_width: 0 },
                (ScanState::Idle, false) => ScanState::Idle,
                (ScanState::Capturing { start, .. }, true) => ScanState::Capturing { start, gap_width: 0 },
                (ScanState::Capturing { start, gap_width }, false) => {
                    let gap_width = gap_width + 1;
                    if gap_width >= min_gap {
                        spans.push(Span::new(start, col - gap_width));
                        ScanState::Idle
                    } else {
                        ScanState::Capturing { start, gap_width }
                    }
                }
            };
        }
        if let ScanState::Capturing { start, .. } = state {
            spans.push(Span::new(start, width - 1));
        }

        spans.retain(|span| span.width() >= self.config.min_segment_width);
        if spans.is_empty() {
            spans.push(Span::full(width));
        }
        spans
    }
}
