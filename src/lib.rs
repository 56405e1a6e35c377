pub mod math;
pub mod config;
pub mod error;
pub mod sample;
pub mod pipeline;
pub mod classify;
pub mod io;
pub mod dataset;

// Convenience re-exports
pub use math::matrix::PixelMatrix;
pub use math::kernel::Kernel;
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use sample::CanonicalSample;
pub use pipeline::{
    Canonicalizer, ContrastNormalizer, DigitSegmenter, Pipeline, Span, StrokeRenderer,
    predict_combined,
};
pub use classify::{Classifier, load_model, find_latest_model};
pub use io::CorrectionStore;
