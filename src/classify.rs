use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use crate::sample::CanonicalSample;

/// Anything that can name the digit in a canonical sample.
pub trait Classifier {
    /// Returns a digit in 0..=9.
    fn classify(&self, sample: &CanonicalSample) -> u8;
}

impl<F> Classifier for F
where
    F: Fn(&CanonicalSample) -> u8,
{
    fn classify(&self, sample: &CanonicalSample) -> u8 {
        self(sample)
    }
}

/// Loads a JSON-serialized classifier.
///
/// A missing, unreadable or malformed file gives `None`: running without a
/// model is a normal state, and callers simply skip prediction.
pub fn load_model<C: DeserializeOwned>(path: impl AsRef<Path>) -> Option<C> {
    let file = std::fs::File::open(path).ok()?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader).ok()
}

/// The most recently modified file in `dir` with the given extension
/// (without the dot), or `None` if the directory is missing or has none.
pub fn find_latest_model(dir: impl AsRef<Path>, extension: &str) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some(extension))
        .filter_map(|e| {
            let modified = e.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, e.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}
