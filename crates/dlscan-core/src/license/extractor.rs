//! Rule-based extraction pipeline.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::license::LicenseInfo;
use crate::ocr::TextDocument;

use super::LicenseExtractor;
use super::rules::{
    calculate_confidence, extract_license_number, DateOfBirthExtractor, FieldExtractor,
    NameExtractor, StateIdentifier,
};

/// Runs state, license number, name and date of birth extraction in sequence,
/// then scores the result.
pub struct RuleBasedExtractor {
    config: ExtractionConfig,
    /// Date ages are evaluated against; the local date when unset.
    reference_date: Option<NaiveDate>,
}

impl RuleBasedExtractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            reference_date: None,
        }
    }

    /// Use the given extraction settings.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluate birth-date plausibility against a fixed date.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn date_extractor(&self) -> DateOfBirthExtractor {
        let extractor = DateOfBirthExtractor::new()
            .with_age_range(self.config.min_age, self.config.max_age)
            .with_earliest_year(self.config.earliest_birth_year);

        match self.reference_date {
            Some(date) => extractor.with_reference_date(date),
            None => extractor,
        }
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LicenseExtractor for RuleBasedExtractor {
    fn extract(&self, document: &TextDocument) -> LicenseInfo {
        let text = document.text();
        let upper = document.upper();

        let state = StateIdentifier::new().extract(&upper);
        let license_number = extract_license_number(&upper, state);
        let names = NameExtractor::new()
            .with_scan_lines(self.config.name_scan_lines)
            .extract(&text);
        let date_of_birth = self.date_extractor().extract(&upper);

        let mut info = LicenseInfo {
            state,
            license_number,
            first_name: names.first_name,
            last_name: names.last_name,
            date_of_birth,
            confidence_score: 0.0,
            raw_text: text,
        };
        info.confidence_score = calculate_confidence(&info);

        debug!(
            "Extracted from {} lines ({} chars)",
            document.lines.len(),
            info.raw_text.len()
        );
        info!(
            "Extracted {}/5 fields, confidence {:.2}",
            info.field_count(),
            info.confidence_score
        );

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::rules::Jurisdiction;
    use pretty_assertions::assert_eq;

    fn extractor() -> RuleBasedExtractor {
        RuleBasedExtractor::new().with_reference_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_full_document() {
        let text = "CT DRIVER LICENSE\nANTOSIO SCHONGLE\n123456789\nCLASS D\nDOB 03/15/1990";
        let info = extractor().extract_from_text(text);

        assert_eq!(info.state, Some(Jurisdiction::Ct));
        assert_eq!(info.license_number.as_deref(), Some("123456789"));
        assert_eq!(info.first_name.as_deref(), Some("ANTOSIO"));
        assert_eq!(info.last_name.as_deref(), Some("SCHONGLE"));
        assert_eq!(info.date_of_birth.as_deref(), Some("03/15/1990"));
        assert_eq!(info.confidence_score, 1.0);
        assert_eq!(info.raw_text, text);
    }

    #[test]
    fn test_field_coded_document() {
        let lines = vec![
            "CA".to_string(),
            "DL A7654321".to_string(),
            "1 SAMPLE".to_string(),
            "2 ALEX".to_string(),
            "7: 08/31/1977".to_string(),
        ];
        let info = extractor().extract(&TextDocument::new(lines));

        assert_eq!(info.state, Some(Jurisdiction::Ca));
        assert_eq!(info.license_number.as_deref(), Some("A7654321"));
        assert_eq!(info.first_name.as_deref(), Some("ALEX"));
        assert_eq!(info.last_name.as_deref(), Some("SAMPLE"));
        assert_eq!(info.date_of_birth.as_deref(), Some("08/31/1977"));
    }

    #[test]
    fn test_empty_document() {
        let info = extractor().extract(&TextDocument::default());
        assert_eq!(info, LicenseInfo::default());
    }

    #[test]
    fn test_no_digits() {
        let info = extractor().extract_from_text("DRIVER LICENSE\nCLASS D");
        assert_eq!(info.license_number, None);
        assert_eq!(info.date_of_birth, None);
        assert!(info.confidence_score <= 0.25);
    }

    #[test]
    fn test_custom_age_range() {
        let config = ExtractionConfig {
            min_age: 40,
            ..ExtractionConfig::default()
        };
        let info = extractor()
            .with_config(config)
            .extract_from_text("DOB 03/15/1990");
        assert_eq!(info.date_of_birth, None);
    }

    #[test]
    fn test_deterministic() {
        let text = "NY\nID: 987654321\nNAME: JANE ROE\nDOB 1/2/1960";
        assert_eq!(extractor().extract_from_text(text), extractor().extract_from_text(text));
    }
}
