//! Rule-based field extractors for US driver's licenses.

pub mod confidence;
pub mod dates;
pub mod jurisdiction;
pub mod names;
pub mod number;
pub mod patterns;
pub mod state;
pub mod validator;

pub use confidence::calculate_confidence;
pub use dates::{extract_date_of_birth, normalize_date, parse_date, DateOfBirthExtractor};
pub use jurisdiction::{
    shape_pattern, supported_jurisdictions, Jurisdiction, ShapePattern, UnknownJurisdiction,
    GENERIC_SHAPE,
};
pub use names::{extract_names, NameExtractor, NameParts};
pub use number::extract_license_number;
pub use state::{identify_state, StateIdentifier};
pub use validator::{validate_license_number, Candidate, Rejection};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
