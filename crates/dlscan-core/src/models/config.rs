//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Main configuration for dlscan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlscanConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers in recognized text.
    pub keep_unk: bool,

    /// Deadline for a single OCR call, in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            timeout_ms: None,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How many leading lines the name-line scan considers.
    pub name_scan_lines: usize,

    /// Minimum plausible holder age in years.
    pub min_age: u32,

    /// Maximum plausible holder age in years.
    pub max_age: u32,

    /// Earliest accepted birth year.
    pub earliest_birth_year: i32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_scan_lines: 8,
            min_age: 16,
            max_age: 120,
            earliest_birth_year: 1900,
        }
    }
}

impl DlscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: DlscanConfig =
            serde_json::from_str(r#"{"extraction": {"min_age": 18}}"#).unwrap();
        assert_eq!(config.extraction.min_age, 18);
        assert_eq!(config.extraction.max_age, 120);
        assert_eq!(config.ocr, OcrConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = DlscanConfig::default();
        config.ocr.timeout_ms = Some(5000);
        config.save(&path).unwrap();

        assert_eq!(DlscanConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(DlscanConfig::from_file(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_model_path() {
        let config = OcrConfig::default();
        assert_eq!(
            config.model_path(&config.detection_model),
            PathBuf::from("models/det.onnx")
        );
    }
}
