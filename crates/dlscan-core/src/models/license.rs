//! License data models.

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::license::rules::Jurisdiction;

/// Fields recovered from a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Issuing jurisdiction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Jurisdiction>,

    /// License number, already accepted by the candidate validator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Date of birth as `MM/DD/YYYY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    /// Weighted share of recovered fields (0.0 - 1.0).
    pub confidence_score: f64,

    /// Recognized text the fields were extracted from.
    pub raw_text: String,
}

impl LicenseInfo {
    /// Number of the five identity fields that were recovered.
    pub fn field_count(&self) -> usize {
        [
            self.state.is_some(),
            self.license_number.is_some(),
            self.first_name.is_some(),
            self.last_name.is_some(),
            self.date_of_birth.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Flat result record returned by every scan entry point.
///
/// Absent fields serialize as `null`; this shape is the stable interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub license_number: Option<String>,
    pub state: Option<Jurisdiction>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub confidence_score: f64,
    pub raw_text: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Successful result carrying every extracted field.
    pub fn success(info: LicenseInfo) -> Self {
        Self {
            license_number: info.license_number,
            state: info.state,
            first_name: info.first_name,
            last_name: info.last_name,
            date_of_birth: info.date_of_birth,
            confidence_score: info.confidence_score,
            raw_text: info.raw_text,
            success: true,
            error: None,
        }
    }

    /// Failed result: every field null and zero confidence.
    pub fn failure(err: &ScanError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            ..Self::default()
        }
    }
}

impl From<Result<LicenseInfo, ScanError>> for ExtractionResult {
    fn from(result: Result<LicenseInfo, ScanError>) -> Self {
        match result {
            Ok(info) => Self::success(info),
            Err(err) => Self::failure(&err),
        }
    }
}
