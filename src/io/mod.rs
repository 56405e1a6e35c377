pub mod decode;
pub mod corrections;

pub use decode::{decode_grayscale, decode_scan, GrayBuffer};
pub use corrections::{CorrectionStore, DEFAULT_CORRECTION_PATH};
