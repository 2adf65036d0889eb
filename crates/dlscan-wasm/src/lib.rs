//! WASM bindings for US driver's license field extraction.
//!
//! Image recognition happens on the JavaScript side; these bindings take the
//! recognized text and return the extracted fields.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use dlscan_core::license::rules::GENERIC_SHAPE;
use dlscan_core::{
    ExtractionConfig, ExtractionResult, Jurisdiction, LicenseExtractor as _, RuleBasedExtractor,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract license fields from recognized text.
///
/// Returns the flat result record as a plain object.
#[wasm_bindgen]
pub fn extract_license_from_text(text: &str) -> Result<JsValue, JsValue> {
    let info = RuleBasedExtractor::new().extract_from_text(text);
    to_js(&ExtractionResult::success(info))
}

/// Check a license number against a jurisdiction's rules.
///
/// An empty or missing code validates against the generic rules only.
#[wasm_bindgen]
pub fn validate_license_number(number: &str, code: Option<String>) -> Result<bool, JsValue> {
    let jurisdiction = parse_code(code.as_deref())?;
    Ok(dlscan_core::validate_license_number(
        &number.trim().to_uppercase(),
        jurisdiction,
    ))
}

/// All supported jurisdiction codes, sorted.
#[wasm_bindgen]
pub fn supported_jurisdictions() -> Vec<String> {
    dlscan_core::supported_jurisdictions()
        .into_iter()
        .map(|j| j.code().to_string())
        .collect()
}

#[derive(Serialize)]
struct ShapeInfo {
    code: &'static str,
    name: &'static str,
    pattern: &'static str,
    description: &'static str,
    specific: bool,
}

/// License-number shape rule for a jurisdiction.
///
/// Jurisdictions without a specific rule report the generic one.
#[wasm_bindgen]
pub fn shape_pattern(code: &str) -> Result<JsValue, JsValue> {
    let j: Jurisdiction = code
        .parse()
        .map_err(|e: dlscan_core::license::rules::UnknownJurisdiction| {
            JsValue::from_str(&e.to_string())
        })?;
    to_js(&shape_info(j))
}

fn shape_info(j: Jurisdiction) -> ShapeInfo {
    let (shape, specific) = match dlscan_core::shape_pattern(j) {
        Some(shape) => (shape, true),
        None => (&*GENERIC_SHAPE, false),
    };
    ShapeInfo {
        code: j.code(),
        name: j.name(),
        pattern: shape.source,
        description: shape.description,
        specific,
    }
}

fn parse_code(code: Option<&str>) -> Result<Option<Jurisdiction>, JsValue> {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => code
            .parse()
            .map(Some)
            .map_err(|e: dlscan_core::license::rules::UnknownJurisdiction| {
                JsValue::from_str(&e.to_string())
            }),
        None => Ok(None),
    }
}

/// License extractor class for browser use.
#[wasm_bindgen]
pub struct LicenseExtractor {
    config: ExtractionConfig,
}

#[wasm_bindgen]
impl LicenseExtractor {
    /// Create a new license extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// Configure how many leading lines are scanned for a name.
    #[wasm_bindgen]
    pub fn set_name_scan_lines(&mut self, lines: usize) {
        self.config.name_scan_lines = lines;
    }

    /// Configure the accepted holder age range.
    #[wasm_bindgen]
    pub fn set_age_range(&mut self, min_age: u32, max_age: u32) {
        self.config.min_age = min_age;
        self.config.max_age = max_age;
    }

    /// Extract license fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extract_result(text))
    }

    /// Extract license fields and return them as a JSON string.
    #[wasm_bindgen]
    pub fn extract_json(&self, text: &str) -> Result<String, JsValue> {
        serde_json::to_string(&self.extract_result(text))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl LicenseExtractor {
    fn extract_result(&self, text: &str) -> ExtractionResult {
        let info = RuleBasedExtractor::new()
            .with_config(self.config.clone())
            .extract_from_text(text);
        ExtractionResult::success(info)
    }
}

impl Default for LicenseExtractor {
    fn default() -> Self {
        Self::new()
    }
}
