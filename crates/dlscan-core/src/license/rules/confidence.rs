//! Confidence scoring for extracted license fields.

use crate::models::license::LicenseInfo;

// Weights in hundredths so sums stay exact decimals
const STATE_WEIGHT: u32 = 25;
const NUMBER_WEIGHT: u32 = 35;
const SHAPE_BONUS: u32 = 10;
const FIRST_NAME_WEIGHT: u32 = 10;
const LAST_NAME_WEIGHT: u32 = 10;
const DATE_OF_BIRTH_WEIGHT: u32 = 10;

/// Weighted share of recovered fields, clamped to 1.0.
///
/// The license number earns a bonus when it fully matches the shape rule of
/// the detected jurisdiction.
pub fn calculate_confidence(info: &LicenseInfo) -> f64 {
    let mut score = 0;

    if info.state.is_some() {
        score += STATE_WEIGHT;
    }

    if let Some(number) = &info.license_number {
        score += NUMBER_WEIGHT;

        let shape = info.state.and_then(|j| j.shape());
        if shape.is_some_and(|s| s.matches(number)) {
            score += SHAPE_BONUS;
        }
    }

    if info.first_name.is_some() {
        score += FIRST_NAME_WEIGHT;
    }
    if info.last_name.is_some() {
        score += LAST_NAME_WEIGHT;
    }
    if info.date_of_birth.is_some() {
        score += DATE_OF_BIRTH_WEIGHT;
    }

    f64::from(score.min(100)) / 100.0
}
