//! Durable store for user-corrected samples.
//!
//! Format: one line per sample, UTF-8, comma-separated, no header:
//!
//! ```text
//! label,v0,v1,...,vN
//! ```
//!
//! `label` is the digit or `-1` when unlabeled; `v0..vN` are the intensities
//! flattened row-major.  The sample side is recovered from the value count,
//! which must therefore be a perfect square.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::math::matrix::PixelMatrix;
use crate::sample::{CanonicalSample, UNLABELED};

pub const DEFAULT_CORRECTION_PATH: &str = "data/user_corrections.csv";

#[derive(Debug, Clone)]
pub struct CorrectionStore {
    path: PathBuf,
}

impl CorrectionStore {
    pub fn new(path: impl Into<PathBuf>) -> CorrectionStore {
        CorrectionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one sample, creating the file and its parent directories on
    /// first use.
    pub fn append(&self, sample: &CanonicalSample) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serialize_row(sample))?;
        writer.flush()?;
        Ok(())
    }

    /// Reads every stored sample.  A store that was never written to is empty.
    pub fn load(&self) -> Result<Vec<CanonicalSample>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                parse_row(line).map_err(|reason| Error::CorruptRow {
                    path: self.path.clone(),
                    line: idx + 1,
                    reason,
                })
            })
            .collect()
    }
}

impl Default for CorrectionStore {
    fn default() -> Self {
        CorrectionStore::new(DEFAULT_CORRECTION_PATH)
    }
}

fn serialize_row(sample: &CanonicalSample) -> String {
    let mut line = sample.label_code().to_string();
    for value in sample.pixels().flatten() {
        line.push(',');
        line.push_str(&value.to_string());
    }
    line
}

fn parse_row(line: &str) -> std::result::Result<CanonicalSample, String> {
    let mut cells = line.split(',').map(str::trim);

    let label_cell = cells.next().unwrap_or_default();
    let label: i32 = label_cell
        .parse()
        .map_err(|_| format!("label '{}' is not an integer", label_cell))?;

    let values = cells
        .map(|c| c.parse::<f64>().map_err(|_| format!("'{}' is not a valid number", c)))
        .collect::<std::result::Result<Vec<f64>, String>>()?;

    let side = (values.len() as f64).sqrt().round() as usize;
    if side == 0 || side * side != values.len() {
        return Err(format!("{} intensities do not form a square sample", values.len()));
    }
    let pixels = PixelMatrix::from_flat(side, side, &values);

    match label {
        UNLABELED => Ok(CanonicalSample::new(pixels)),
        0..=9 => Ok(CanonicalSample::with_label(pixels, label as u8)),
        other => Err(format!("label {} is outside 0..=9", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_with_ink(label: Option<u8>) -> CanonicalSample {
        let mut pixels = PixelMatrix::zeros(28, 28);
        pixels.set(3, 4, 1.0);
        pixels.set(10, 10, 0.125);
        match label {
            Some(l) => CanonicalSample::with_label(pixels, l),
            None => CanonicalSample::new(pixels),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorrectionStore::new(dir.path().join("none.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn appended_samples_load_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorrectionStore::new(dir.path().join("nested/dir/corrections.csv"));

        store.append(&sample_with_ink(Some(7))).unwrap();
        store.append(&sample_with_ink(None)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![sample_with_ink(Some(7)), sample_with_ink(None)]);
    }

    #[test]
    fn row_layout_is_label_then_pixels() {
        let row = serialize_row(&sample_with_ink(Some(2)));
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells.len(), 1 + 28 * 28);
        assert_eq!(cells[0], "2");
        assert_eq!(cells[1 + 3 * 28 + 4], "1");
        assert_eq!(cells[1 + 10 * 28 + 10], "0.125");
    }

    #[test]
    fn corrupt_row_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let good = serialize_row(&sample_with_ink(Some(1)));
        fs::write(&path, format!("{}\n\n3,0.5,abc,0.1,0.2\n", good)).unwrap();

        match CorrectionStore::new(&path).load() {
            Err(Error::CorruptRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected CorruptRow, got {:?}", other),
        }
    }

    #[test]
    fn non_square_rows_are_rejected() {
        assert!(parse_row("1,0.0,0.0,0.0").is_err());
        assert!(parse_row("12,0.0,0.0,0.0,0.0").is_err());
        assert!(parse_row("-1,0.0,1.0,0.0,1.0").is_ok());
    }
}
