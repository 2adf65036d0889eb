//! Date of birth extraction and normalization.

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, trace};

use super::FieldExtractor;
use super::patterns::{DATE_MDY, DATE_TOKEN, DATE_YMD, DOB_LABELS, FIELD_7_INLINE};

/// Parse formats, tried in order.
const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d", "%Y-%m-%d"];

/// Canonical output format.
const OUTPUT_FORMAT: &str = "%m/%d/%Y";

/// Date of birth extractor.
///
/// Candidates come from field code 7, then labeled dates, then any date in the
/// text. Every candidate must be a valid birth year and give a plausible age
/// at the reference date.
pub struct DateOfBirthExtractor {
    today: NaiveDate,
    min_age: u32,
    max_age: u32,
    earliest_year: i32,
}

impl DateOfBirthExtractor {
    /// Create an extractor evaluating ages against the local date.
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
            min_age: 16,
            max_age: 120,
            earliest_year: 1900,
        }
    }

    /// Evaluate ages against a fixed date.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Set the accepted age range (inclusive).
    pub fn with_age_range(mut self, min_age: u32, max_age: u32) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    /// Set the earliest accepted birth year.
    pub fn with_earliest_year(mut self, year: i32) -> Self {
        self.earliest_year = year;
        self
    }

    /// Check that the birth year lies between the earliest year and the
    /// latest year that still satisfies the minimum age.
    pub fn is_valid_date(&self, date: NaiveDate) -> bool {
        let latest = self.today.year() - self.min_age as i32;
        (self.earliest_year..=latest).contains(&date.year())
    }

    /// Check that the age at the reference date is within the accepted range.
    pub fn looks_like_birth_date(&self, date: NaiveDate) -> bool {
        self.today
            .years_since(date)
            .is_some_and(|age| (self.min_age..=self.max_age).contains(&age))
    }

    fn accept(&self, token: &str, source: &str) -> Option<String> {
        let date = parse_date(token)?;
        if !self.is_valid_date(date) || !self.looks_like_birth_date(date) {
            trace!("Rejected {} date {}", source, token);
            return None;
        }
        Some(date.format(OUTPUT_FORMAT).to_string())
    }

    fn field_code_dates(&self, text: &str) -> Vec<String> {
        let inline = FIELD_7_INLINE
            .captures_iter(text)
            .filter_map(|caps| self.accept(&caps[1], "field 7"));

        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let split = lines.windows(2).filter_map(|pair| {
            if pair[0] != "7" {
                return None;
            }
            let token = pair[1].split_whitespace().next()?;
            if !DATE_TOKEN.is_match(token) {
                return None;
            }
            self.accept(token, "field 7")
        });

        inline.chain(split).collect()
    }

    fn labeled_dates(&self, text: &str) -> Vec<String> {
        DOB_LABELS
            .iter()
            .flat_map(|pattern| pattern.captures_iter(text))
            .filter_map(|caps| self.accept(&caps[1], "labeled"))
            .collect()
    }

    fn unlabeled_dates(&self, text: &str) -> Vec<String> {
        DATE_MDY
            .captures_iter(text)
            .chain(DATE_YMD.captures_iter(text))
            .filter_map(|caps| self.accept(&caps[1], "unlabeled"))
            .collect()
    }
}

impl Default for DateOfBirthExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateOfBirthExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let upper = text.to_uppercase();

        let stages: [(&str, fn(&Self, &str) -> Vec<String>); 3] = [
            ("field 7", Self::field_code_dates),
            ("labeled", Self::labeled_dates),
            ("unlabeled", Self::unlabeled_dates),
        ];

        for (stage, run) in stages {
            if let Some(date) = run(self, &upper).into_iter().next() {
                debug!("Date of birth found by {} stage", stage);
                return Some(date);
            }
        }

        debug!("No date of birth found");
        None
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let upper = text.to_uppercase();
        let mut results: Vec<String> = Vec::new();

        for date in self
            .field_code_dates(&upper)
            .into_iter()
            .chain(self.labeled_dates(&upper))
            .chain(self.unlabeled_dates(&upper))
        {
            if !results.contains(&date) {
                results.push(date);
            }
        }

        results
    }
}

/// Extract a date of birth evaluated against the local date.
pub fn extract_date_of_birth(text: &str) -> Option<String> {
    DateOfBirthExtractor::new().extract(text)
}

/// Parse a date token with the supported formats, in order.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token.trim(), format).ok())
}

/// Normalize a date to `MM/DD/YYYY`. Unparseable input is returned unchanged.
pub fn normalize_date(token: &str) -> String {
    match parse_date(token) {
        Some(date) => date.format(OUTPUT_FORMAT).to_string(),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> DateOfBirthExtractor {
        DateOfBirthExtractor::new().with_reference_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_field_7_inline() {
        let text = "4D 123456789 7: 03/15/1990\n8 123 MAIN ST";
        assert_eq!(extractor().extract(text), Some("03/15/1990".to_string()));
    }

    #[test]
    fn test_field_7_split_line() {
        let text = "7\n03-15-1990\nEXP 03-15-2030";
        assert_eq!(extractor().extract(text), Some("03/15/1990".to_string()));
    }

    #[test]
    fn test_field_7_preferred_over_label() {
        let text = "DOB 01/01/1980\n7: 02/02/1985";
        assert_eq!(extractor().extract(text), Some("02/02/1985".to_string()));
    }

    #[test]
    fn test_labeled_dates() {
        assert_eq!(extractor().extract("DOB: 3/5/1985"), Some("03/05/1985".to_string()));
        assert_eq!(
            extractor().extract("DATE OF BIRTH 12-25-1970"),
            Some("12/25/1970".to_string())
        );
        assert_eq!(extractor().extract("d.o.b. 01/02/1960"), Some("01/02/1960".to_string()));
        assert_eq!(extractor().extract("BORN 07/04/1976"), Some("07/04/1976".to_string()));
    }

    #[test]
    fn test_unlabeled_date_filtered_by_age() {
        // Issue date is too recent, expiry is in the future
        let text = "ISS 01/15/2020\nEXP 01/15/2028\n1990/07/04";
        assert_eq!(extractor().extract(text), Some("07/04/1990".to_string()));
    }

    #[test]
    fn test_rejects_implausible_dates() {
        assert_eq!(extractor().extract("DOB 01/01/1890"), None);
        assert_eq!(extractor().extract("DOB 01/01/2015"), None);
        assert_eq!(extractor().extract("DOB 13/45/1990"), None);
        assert_eq!(extractor().extract("NO DATES HERE"), None);
    }

    #[test]
    fn test_age_boundaries() {
        let e = extractor();
        // Turned 16 on the reference date
        assert!(e.looks_like_birth_date(NaiveDate::from_ymd_opt(2008, 6, 1).unwrap()));
        // Turns 16 tomorrow
        assert!(!e.looks_like_birth_date(NaiveDate::from_ymd_opt(2008, 6, 2).unwrap()));
        assert!(e.looks_like_birth_date(NaiveDate::from_ymd_opt(1904, 6, 1).unwrap()));
        assert!(!e.looks_like_birth_date(NaiveDate::from_ymd_opt(1903, 6, 1).unwrap()));
    }

    #[test]
    fn test_valid_year_range() {
        let e = extractor();
        assert!(e.is_valid_date(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()));
        assert!(!e.is_valid_date(NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()));
        assert!(e.is_valid_date(NaiveDate::from_ymd_opt(2008, 12, 31).unwrap()));
        assert!(!e.is_valid_date(NaiveDate::from_ymd_opt(2009, 1, 1).unwrap()));
    }

    #[test]
    fn test_custom_age_range() {
        let e = extractor().with_age_range(21, 100).with_earliest_year(1920);
        assert_eq!(e.extract("DOB 01/01/2005"), None);
        assert_eq!(e.extract("DOB 01/01/1910"), None);
        assert_eq!(e.extract("DOB 01/01/1990"), Some("01/01/1990".to_string()));
    }

    #[test]
    fn test_extract_all() {
        let text = "DOB 01/02/1980\n01/02/1980\n1975-05-06";
        assert_eq!(
            extractor().extract_all(text),
            vec!["01/02/1980".to_string(), "05/06/1975".to_string()]
        );
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("03/15/1990"), "03/15/1990");
        assert_eq!(normalize_date("3-5-1990"), "03/05/1990");
        assert_eq!(normalize_date("1990/03/15"), "03/15/1990");
        assert_eq!(normalize_date("1990-03-15"), "03/15/1990");
        assert_eq!(normalize_date("NOT A DATE"), "NOT A DATE");
    }

    #[test]
    fn test_normalize_date_is_idempotent() {
        for token in ["3/5/1990", "12-31-1999", "2000/02/29", "1985-11-01", "garbage"] {
            let once = normalize_date(token);
            assert_eq!(normalize_date(&once), once);
        }
    }
}
