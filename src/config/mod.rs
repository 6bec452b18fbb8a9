//! Pipeline Configuration
//!
//! Tunable parameters for the identification pipeline, stored in TOML
//! format. The geometric constants (clustering tolerance, scan region) were
//! chosen empirically against cover photos and are exposed here rather than
//! hard-coded; the noise denylists are likewise overridable.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Scan region settings
    pub roi: RoiConfig,
    /// Line clustering settings
    pub layout: LayoutConfig,
    /// Noise filtering settings
    pub filter: FilterConfig,
    /// Candidate extraction settings
    pub extract: ExtractConfig,
}

/// Region of interest: the normalized sub-area of a frame considered for
/// text extraction, approximating the scan frame shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiConfig {
    /// Left edge of the scan region
    pub x_min: f32,
    /// Right edge of the scan region
    pub x_max: f32,
    /// Bottom edge of the scan region
    pub y_min: f32,
    /// Top edge of the scan region
    pub y_max: f32,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            x_min: 0.15,
            x_max: 0.85,
            y_min: 0.20,
            y_max: 0.85,
        }
    }
}

/// Line clustering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Maximum vertical-center distance for two observations to be merged
    /// into the same line, as a fraction of image height
    pub vertical_tolerance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_tolerance: 0.06,
        }
    }
}

/// Noise filtering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum trimmed text length to keep
    pub min_text_len: usize,
    /// Total digit count at or above which text is treated as barcode noise
    pub max_digits: usize,
    /// Publisher names whose presence marks a line as imprint noise
    pub publishers: Vec<String>,
    /// Series/edition markers whose presence marks a line as noise
    pub series_markers: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_text_len: 3,
            max_digits: 8,
            publishers: [
                "penguin",
                "scholastic",
                "harpercollins",
                "random house",
                "simon & schuster",
                "macmillan",
                "hachette",
                "vintage",
                "bantam",
                "doubleday",
                "puffin",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            series_markers: [
                "classics",
                "edition",
                "anniversary",
                "bestseller",
                "paperback",
                "hardcover",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Candidate extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Bottom of the vertical band searched for author names; text below it
    /// is usually a publisher imprint
    pub author_band_min: f32,
    /// Top of the vertical band searched for author names; text above it is
    /// usually a cover quote
    pub author_band_max: f32,
    /// Minimum vertical gap between a title and the author line beneath it
    pub author_gap: f32,
    /// Vertical center above which lines may join a combined multi-line title
    pub title_band_min: f32,
    /// Minimum line height for combined-title membership
    pub min_title_line_height: f32,
    /// A combined-title line must be at least this fraction of the tallest
    /// member's height
    pub combined_height_ratio: f32,
    /// Substrings that disqualify a combined title (cover blurbs that tend
    /// to cluster at the top of the image)
    pub combined_denylist: Vec<String>,
    /// Maximum candidates forwarded to the catalog search fallback
    pub max_candidates: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            author_band_min: 0.25,
            author_band_max: 0.75,
            author_gap: 0.05,
            title_band_min: 0.6,
            min_title_line_height: 0.015,
            combined_height_ratio: 0.7,
            combined_denylist: [
                "new york times",
                "bestselling author",
                "million copies",
                "now a major motion picture",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_candidates: 3,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &PipelineConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();

        assert!((config.roi.x_min - 0.15).abs() < 0.001);
        assert!((config.roi.y_max - 0.85).abs() < 0.001);
        assert!((config.layout.vertical_tolerance - 0.06).abs() < 0.001);
        assert_eq!(config.filter.min_text_len, 3);
        assert_eq!(config.filter.max_digits, 8);
        assert!(config.filter.publishers.iter().any(|p| p == "penguin"));
        assert_eq!(config.extract.max_candidates, 3);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = PipelineConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: PipelineConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.filter.publishers, parsed.filter.publishers);
        assert_eq!(
            config.extract.combined_denylist,
            parsed.extract.combined_denylist
        );
        assert!(
            (config.layout.vertical_tolerance - parsed.layout.vertical_tolerance).abs() < 0.001
        );
    }

    #[test]
    fn test_config_file_roundtrip() {
        let file = NamedTempFile::new().unwrap();

        let mut config = PipelineConfig::default();
        config.layout.vertical_tolerance = 0.08;
        config.filter.series_markers.push("collection".to_string());

        save_config(&config, file.path()).unwrap();
        let loaded = load_config(file.path()).unwrap();

        assert!((loaded.layout.vertical_tolerance - 0.08).abs() < 0.001);
        assert!(loaded.filter.series_markers.iter().any(|m| m == "collection"));
    }
}
