//! Jurisdiction identification from document text.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::jurisdiction::Jurisdiction;
use super::FieldExtractor;

lazy_static! {
    /// One pattern per jurisdiction, in priority order. Each alternation covers
    /// the bare code, `<code> DRIVER`, `<code> LICENSE` and `STATE OF <code>`.
    static ref STATE_PATTERNS: Vec<(Jurisdiction, Regex)> = Jurisdiction::priority_order()
        .iter()
        .map(|j| {
            let code = j.code();
            let pattern = format!(
                r"\b{code}\b|{code}\s+DRIVER|{code}\s+LICENSE|STATE\s+OF\s+{code}"
            );
            (*j, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// Finds the issuing jurisdiction of a document.
pub struct StateIdentifier;

impl StateIdentifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StateIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StateIdentifier {
    type Output = Jurisdiction;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let upper = text.to_uppercase();
        let found = STATE_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(&upper))
            .map(|(j, _)| *j);

        match found {
            Some(j) => debug!("Identified jurisdiction {}", j),
            None => debug!("No jurisdiction found"),
        }
        found
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let upper = text.to_uppercase();
        STATE_PATTERNS
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&upper))
            .map(|(j, _)| *j)
            .collect()
    }
}

/// Identify the jurisdiction of a document.
pub fn identify_state(text: &str) -> Option<Jurisdiction> {
    StateIdentifier::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bare_code() {
        assert_eq!(identify_state("CT\nLIC# 987654321"), Some(Jurisdiction::Ct));
        assert_eq!(identify_state("wy"), Some(Jurisdiction::Wy));
    }

    #[test]
    fn test_code_with_driver_or_license() {
        assert_eq!(identify_state("TXDL / TX DRIVER"), Some(Jurisdiction::Tx));
        assert_eq!(identify_state("NJLICENSE NJ LICENSE"), Some(Jurisdiction::Nj));
    }

    #[test]
    fn test_state_of() {
        assert_eq!(identify_state("STATE OF  NV"), Some(Jurisdiction::Nv));
    }

    #[test]
    fn test_suffix_and_prefix_forms_without_bare_code() {
        // The code is glued to a neighbouring token, so only the longer forms match
        assert_eq!(identify_state("XUT DRIVER"), Some(Jurisdiction::Ut));
        assert_eq!(identify_state("XNV LICENSE"), Some(Jurisdiction::Nv));
        assert_eq!(identify_state("STATE OF NVX"), Some(Jurisdiction::Nv));
        assert_eq!(identify_state("XUT"), None);
    }

    #[test]
    fn test_no_state() {
        assert_eq!(identify_state("NOTHING HERE 12345"), None);
        assert_eq!(identify_state(""), None);
    }

    #[test]
    fn test_priority_order_decides() {
        // Both codes present: the earlier entry in the priority list wins
        assert_eq!(identify_state("NY 123\nCA 456"), Some(Jurisdiction::Ca));
        assert_eq!(
            StateIdentifier::new().extract_all("NY 123\nCA 456"),
            vec![Jurisdiction::Ca, Jurisdiction::Ny]
        );
    }

    #[test]
    fn test_deterministic() {
        let text = "ME\nOR\nIN\nDC";
        let first = identify_state(text);
        for _ in 0..10 {
            assert_eq!(identify_state(text), first);
        }
        assert_eq!(first, Some(Jurisdiction::In));
    }
}
