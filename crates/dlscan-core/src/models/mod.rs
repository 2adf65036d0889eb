//! Data models and configuration.

pub mod config;
pub mod license;

pub use config::{DlscanConfig, ExtractionConfig, OcrConfig};
pub use license::{ExtractionResult, LicenseInfo};
