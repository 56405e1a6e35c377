pub mod matrix;
pub mod kernel;

pub use matrix::PixelMatrix;
pub use kernel::{Kernel, STROKE_FEATHER, CONTRAST_FEATHER};
