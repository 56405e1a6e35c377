pub mod stroke;
pub mod contrast;
pub mod segment;
pub mod canonical;
pub mod compose;

pub use stroke::StrokeRenderer;
pub use contrast::{ContrastNormalizer, NormalizedImage};
pub use segment::{DigitSegmenter, Span};
pub use canonical::Canonicalizer;
pub use compose::{Pipeline, ScanResult, predict_combined, label_samples};
