//! Known tool-failure detection
//!
//! The analysis tool reports domain-validation failures only via free-text
//! diagnostics. This matcher is the sole translation layer between that
//! text and the stable error taxonomy callers can rely on.

use orgminer_core::catalog::KNOWN_TOOL_ERRORS;

/// Scans combined stdout+stderr text for a known failure signature.
///
/// Matching is case-insensitive substring containment, checked in
/// catalog-declaration order; the first hit wins. Returns `None` when no
/// signature matches.
pub fn detect_tool_failure(combined_output: &str) -> Option<&'static str> {
    let haystack = combined_output.to_lowercase();

    KNOWN_TOOL_ERRORS
        .iter()
        .find(|(signature, _)| haystack.contains(&signature.to_lowercase()))
        .map(|(_, message)| *message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_error() {
        let output = "There must be at least 100 commits in the repository.";
        assert_eq!(
            detect_tool_failure(output),
            Some("Invalid Repository: There must be at least 100 commits!")
        );
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        let output = "there must be at least 2 MEMBERS in the repository";
        assert_eq!(
            detect_tool_failure(output),
            Some("Invalid Repository: Not enough members (min. 2)!")
        );
    }

    #[test]
    fn test_unknown_output_returns_none() {
        let output = "Analysis completed successfully with 3 patterns found.";
        assert_eq!(detect_tool_failure(output), None);
    }

    #[test]
    fn test_partial_signature_does_not_trigger() {
        let output = "There must be at least some data in the repository.";
        assert_eq!(detect_tool_failure(output), None);
    }

    #[test]
    fn test_first_signature_in_catalog_order_wins() {
        let output = "Invalid repository: there must be at least 100 commits";
        assert_eq!(
            detect_tool_failure(output),
            Some("Invalid Repository: There must be at least 100 commits!")
        );
    }
}
