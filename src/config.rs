use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::math::kernel::{Kernel, STROKE_FEATHER, CONTRAST_FEATHER};

/// Drawing canvas parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub width: usize,
    pub height: usize,
    /// Weights added to the eight neighbours of every painted pixel.
    pub kernel: Kernel,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        StrokeConfig { width: 28, height: 28, kernel: STROKE_FEATHER }
    }
}

/// Photo contrast normalization parameters.
///
/// - `size`      — side of the square buffer the decoder hands over
/// - `threshold` — inverted intensity above which a pixel counts as ink; also
///                 the upper knee of the final remap
/// - `floor`     — feathered values below this are treated as background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    pub size: usize,
    pub threshold: f64,
    pub floor: f64,
    pub kernel: Kernel,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        ContrastConfig { size: 28, threshold: 0.35, floor: 0.05, kernel: CONTRAST_FEATHER }
    }
}

/// Column-projection segmentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Fraction of the matrix height a column sum must reach to count as ink.
    pub gap_threshold_ratio: f64,
    /// Consecutive blank columns that close a span.
    pub min_gap_width: usize,
    /// Narrower spans are dropped as noise.
    pub min_segment_width: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        SegmentConfig { gap_threshold_ratio: 0.05, min_gap_width: 3, min_segment_width: 3 }
    }
}

/// Canonical sample layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalConfig {
    pub target_size: usize,
    /// Blank border kept on every side of the rescaled digit.
    pub margin: usize,
    /// Lower bound on the rescale factor.
    pub min_scale: f64,
    /// Collapse interpolated edge values to hard 0/1 ink.  When off, the
    /// resampled edges stay graded and stroke interiors are 1.0.
    pub binarize: bool,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        CanonicalConfig { target_size: 28, margin: 4, min_scale: 0.1, binarize: true }
    }
}

impl CanonicalConfig {
    /// Side length left for the digit once margins are removed.
    pub fn available_size(&self) -> usize {
        self.target_size.saturating_sub(2 * self.margin)
    }
}

/// Every tunable constant of the pipeline, grouped per stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub stroke: StrokeConfig,
    pub contrast: ContrastConfig,
    pub segment: SegmentConfig,
    pub canonical: CanonicalConfig,
}

impl PipelineConfig {
    /// Checks the relationships between fields that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if self.stroke.width == 0 || self.stroke.height == 0 {
            return invalid(format!("stroke canvas must be non-empty, got {}x{}", self.stroke.width, self.stroke.height));
        }
        if self.contrast.size == 0 {
            return invalid("contrast size must be non-zero".into());
        }
        let (floor, threshold) = (self.contrast.floor, self.contrast.threshold);
        if !(0.0..1.0).contains(&floor) || !(0.0..1.0).contains(&threshold) || floor >= threshold {
            return invalid(format!("need 0 <= floor < threshold < 1, got floor {} threshold {}", floor, threshold));
        }
        if !(0.0..=1.0).contains(&self.segment.gap_threshold_ratio) {
            return invalid(format!("gap_threshold_ratio {} outside [0, 1]", self.segment.gap_threshold_ratio));
        }
        if self.segment.min_gap_width == 0 {
            return invalid("min_gap_width must be at least 1".into());
        }
        if self.canonical.available_size() == 0 {
            return invalid(format!(
                "margin {} leaves no room in a {}px target",
                self.canonical.margin, self.canonical.target_size
            ));
        }
        if self.canonical.min_scale <= 0.0 {
            return invalid(format!("min_scale must be positive, got {}", self.canonical.min_scale));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config written by `save_json`; missing fields take their
    /// defaults.  The result is validated before it is returned.
    pub fn load_json(path: &str) -> Result<PipelineConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: PipelineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canonical.available_size(), 20);
    }

    #[test]
    fn floor_above_threshold_is_rejected() {
        let mut config = PipelineConfig::default();
        config.contrast.floor = 0.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let mut config = PipelineConfig::default();
        config.canonical.margin = 14;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "segment": { "min_gap_width": 5 } }"#).unwrap();
        assert_eq!(config.segment.min_gap_width, 5);
        assert_eq!(config.segment.min_segment_width, 3);
        assert_eq!(config.contrast, ContrastConfig::default());
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        let path = path.to_str().unwrap();

        let mut config = PipelineConfig::default();
        config.canonical.binarize = false;
        config.save_json(path).unwrap();

        assert_eq!(PipelineConfig::load_json(path).unwrap(), config);
    }
}
