//! Technology/material compatibility
//!
//! A fixed matrix maps each printing technology to the materials it can
//! process. Two entry points are provided: a side-effect-free predicate for
//! field-level validation, and a strict form for service-layer control flow.

use crate::error::{Error, Result};

/// Allowed materials per technology
const COMPATIBILITY: &[(&str, &[&str])] = &[
    ("FDM", &["PLA", "ABS", "PETG", "TPU"]),
    ("SLS", &["PLA", "ABS", "PETG"]),
    ("SLA", &["PLA", "ABS"]),
];

/// Look up the allowed materials for a technology
pub fn allowed_materials(technology: &str) -> Option<&'static [&'static str]> {
    COMPATIBILITY
        .iter()
        .find(|(tech, _)| *tech == technology)
        .map(|(_, materials)| *materials)
}

/// Side-effect-free compatibility predicate
///
/// A missing technology or material means "not yet decided" and passes;
/// mandatory-field checks downstream handle that case.
pub fn is_compatible(technology: Option<&str>, material: Option<&str>) -> bool {
    let (Some(technology), Some(material)) = (technology, material) else {
        return true;
    };
    match allowed_materials(technology) {
        Some(materials) => materials.contains(&material),
        None => false,
    }
}

/// Strict compatibility check for service-layer control flow
///
/// # Errors
///
/// Returns [`Error::InvalidCombination`] naming both values when the pair is
/// not in the matrix.
pub fn ensure_compatible(technology: &str, material: &str) -> Result<()> {
    if is_compatible(Some(technology), Some(material)) {
        Ok(())
    } else {
        Err(Error::incompatible(technology, material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_accepts_exactly_the_allowed_pairs() {
        for (tech, materials) in COMPATIBILITY {
            for material in *materials {
                assert!(
                    ensure_compatible(tech, material).is_ok(),
                    "{tech}/{material} should be allowed"
                );
            }
        }
    }

    #[test]
    fn test_rejected_pairs_name_both_values() {
        let err = ensure_compatible("SLA", "TPU").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SLA"));
        assert!(msg.contains("TPU"));
    }

    #[test]
    fn test_unknown_technology_rejected() {
        assert!(ensure_compatible("DLP", "PLA").is_err());
    }

    #[test]
    fn test_undecided_values_pass_the_predicate() {
        assert!(is_compatible(None, Some("PLA")));
        assert!(is_compatible(Some("FDM"), None));
        assert!(is_compatible(None, None));
    }

    #[test]
    fn test_predicate_rejects_bad_pair() {
        assert!(!is_compatible(Some("SLS"), Some("TPU")));
    }
}
