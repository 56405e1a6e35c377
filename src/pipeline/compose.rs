use crate::classify::Classifier;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::math::matrix::PixelMatrix;
use crate::pipeline::canonical::Canonicalizer;
use crate::pipeline::contrast::{ContrastNormalizer, NormalizedImage};
use crate::pipeline::segment::{DigitSegmenter, Span};
use crate::pipeline::stroke::StrokeRenderer;
use crate::sample::CanonicalSample;

/// Result of reading a multi-digit scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Normalized intensities of the whole scan, with its display copy.
    pub normalized: NormalizedImage,
    pub spans: Vec<Span>,
    /// One sample per span, left to right.
    pub samples: Vec<CanonicalSample>,
}

/// All stages built from one `PipelineConfig`.
///
/// Every entry point is `&self`, so a single `Pipeline` can be shared by
/// independent callers; only the `StrokeRenderer` it hands out is mutable.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: ContrastNormalizer,
    segmenter: DigitSegmenter,
    canonicalizer: Canonicalizer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Pipeline> {
        config.validate()?;
        Ok(Pipeline {
            normalizer: ContrastNormalizer::new(config.contrast.clone()),
            segmenter: DigitSegmenter::new(config.segment.clone()),
            canonicalizer: Canonicalizer::new(config.canonical.clone()),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// A fresh black canvas for a drawing session.
    pub fn renderer(&self) -> StrokeRenderer {
        StrokeRenderer::new(&self.config.stroke)
    }

    /// Free-hand drawing: the canvas is already canonical.
    pub fn sample_from_canvas(&self, renderer: &StrokeRenderer) -> CanonicalSample {
        renderer.to_sample()
    }

    /// Uploaded photo, already decoded and resized to `contrast.size` square.
    pub fn sample_from_photo(&self, gray_bytes: &[u8]) -> Result<(CanonicalSample, image::GrayImage)> {
        let normalized = self.normalizer.normalize(gray_bytes)?;
        let preview = normalized.preview.clone();
        Ok((normalized.into_sample(), preview))
    }

    /// Multi-digit scan given as raw grayscale bytes of any width.
    pub fn read_scan(&self, gray_bytes: &[u8], width: usize, height: usize) -> Result<ScanResult> {
        let normalized = self.normalizer.normalize_buffer(gray_bytes, width, height)?;
        let spans = self.segmenter.find_spans(&normalized.pixels);
        let samples = self.canonicalize_spans(&normalized.pixels, &spans);
        Ok(ScanResult { normalized, spans, samples })
    }

    /// Multi-digit scan given as an already normalized matrix.
    pub fn samples_from_matrix(&self, matrix: &PixelMatrix) -> Vec<CanonicalSample> {
        let spans = self.segmenter.find_spans(matrix);
        self.canonicalize_spans(matrix, &spans)
    }

    fn canonicalize_spans(&self, matrix: &PixelMatrix, spans: &[Span]) -> Vec<CanonicalSample> {
        spans
            .iter()
            .map(|&span| self.canonicalizer.canonicalize(matrix, span))
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline {
            config: PipelineConfig::default(),
            normalizer: ContrastNormalizer::default(),
            segmenter: DigitSegmenter::default(),
            canonicalizer: Canonicalizer::default(),
        }
    }
}

/// Classifies each sample in order and joins the digits into one string.
///
/// With no classifier, or nothing to classify, there is no prediction.
pub fn predict_combined<C: Classifier>(classifier: Option<&C>, samples: &[CanonicalSample]) -> Option<String> {
    let classifier = classifier?;
    if samples.is_empty() {
        return None;
    }
    Some(
        samples
            .iter()
            .map(|s| char::from(b'0' + classifier.classify(s).min(9)))
            .collect(),
    )
}

/// Like `predict_combined`, but also stores each digit on its sample.
pub fn label_samples<C: Classifier>(classifier: Option<&C>, samples: &mut [CanonicalSample]) -> Option<String> {
    let combined = predict_combined(classifier, samples)?;
    for (sample, digit) in samples.iter_mut().zip(combined.bytes()) {
        sample.set_label(digit - b'0');
    }
    Some(combined)
}
