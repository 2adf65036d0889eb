//! Core library for US driver's license scanning.
//!
//! This crate provides:
//! - An OCR collaborator interface with a native `pure-onnx-ocr` engine
//! - Rule-based extraction of jurisdiction, license number, name and date of birth
//! - License-number validation against per-jurisdiction shape rules
//! - Confidence scoring and a flat, serializable result record

pub mod error;
pub mod license;
pub mod models;
pub mod ocr;

pub use error::{ConfigError, OcrError, Result, ScanError};
pub use license::rules::{
    shape_pattern, supported_jurisdictions, validate_license_number, Jurisdiction, ShapePattern,
};
pub use license::{LicenseExtractor, LicenseScanner, RuleBasedExtractor};
pub use models::config::{DlscanConfig, ExtractionConfig, OcrConfig};
pub use models::license::{ExtractionResult, LicenseInfo};
pub use ocr::{OcrProvider, TextDocument};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
