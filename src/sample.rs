use serde::{Serialize, Deserialize};
use crate::math::matrix::PixelMatrix;

/// Label code used on disk for a sample nobody has labelled yet.
pub const UNLABELED: i32 = -1;

/// A fixed-size intensity grid in the layout the classifier consumes, plus
/// the digit it shows once that is known.
///
/// The pixels are frozen at construction; only the label may change later,
/// when a prediction or a user correction is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSample {
    pixels: PixelMatrix,
    label: Option<u8>,
}

impl CanonicalSample {
    pub fn new(pixels: PixelMatrix) -> CanonicalSample {
        CanonicalSample { pixels, label: None }
    }

    pub fn with_label(pixels: PixelMatrix, label: u8) -> CanonicalSample {
        CanonicalSample { pixels, label: Some(label) }
    }

    pub fn pixels(&self) -> &PixelMatrix {
        &self.pixels
    }

    pub fn label(&self) -> Option<u8> {
        self.label
    }

    /// The label as stored in correction files: the digit, or `UNLABELED`.
    pub fn label_code(&self) -> i32 {
        self.label.map_or(UNLABELED, i32::from)
    }

    pub fn set_label(&mut self, label: u8) {
        self.label = Some(label);
    }

    pub fn into_pixels(self) -> PixelMatrix {
        self.pixels
    }
}
