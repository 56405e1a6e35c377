use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures at the I/O edges of the pipeline.  The pixel stages themselves
/// never fail; they fall back instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// A byte buffer whose length does not match the declared dimensions.
    #[error("Buffer holds {actual} bytes, expected {width}x{height}")]
    BufferSize { width: usize, height: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A correction file row that cannot be read back as a sample.
    #[error("{}: line {line}: {reason}", .path.display())]
    CorruptRow { path: PathBuf, line: usize, reason: String },
}
