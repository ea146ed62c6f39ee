//! Result and error types for Esperar.

use thiserror::Error;

/// Result type for Esperar operations
pub type EsperarResult<T> = Result<T, EsperarError>;

/// Errors that can occur while resolving locators, dispatching input, or
/// waiting on assertions.
#[derive(Debug, Error)]
pub enum EsperarError {
    /// A locator resolved to zero elements where at least one was required
    #[error("No element matched locator `{target}`")]
    ResolutionEmpty {
        /// Step chain of the offending locator
        target: String,
    },

    /// A single-element operation matched more than one element.
    ///
    /// This is deliberately loud instead of silently picking the first
    /// match, so brittle selectors surface early.
    #[error("Locator `{target}` matched {count} elements, expected exactly 1")]
    AmbiguousMatch {
        /// Step chain of the offending locator
        target: String,
        /// How many elements matched
        count: usize,
    },

    /// A predicate never became true within the retry window
    #[error(
        "Timed out after {elapsed_ms}ms waiting for `{target}`: expected {expected}, last observed {observed}"
    )]
    AssertionTimeout {
        /// Human-readable predicate description
        expected: String,
        /// Last observed state of the resolved set
        observed: String,
        /// Step chain of the locator being watched
        target: String,
        /// Elapsed wall time in milliseconds
        elapsed_ms: u64,
    },

    /// The underlying browser session is gone; fatal, never retried
    #[error("Driver unavailable: {message}")]
    DriverUnavailable {
        /// What happened to the session
        message: String,
    },

    /// Navigation failed
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Input dispatch failed
    #[error("Input dispatch failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_empty_names_locator() {
        let err = EsperarError::ResolutionEmpty {
            target: "role=button[name~\"Save\"]".to_string(),
        };
        assert!(err.to_string().contains("role=button"));
    }

    #[test]
    fn test_timeout_reports_expected_and_observed() {
        let err = EsperarError::AssertionTimeout {
            expected: "visible".to_string(),
            observed: "no matching nodes".to_string(),
            target: "text~\"Inbox\"".to_string(),
            elapsed_ms: 5000,
        };
        let msg = err.to_string();
        assert!(msg.contains("visible"));
        assert!(msg.contains("no matching nodes"));
        assert!(msg.contains("5000ms"));
    }

    #[test]
    fn test_ambiguous_match_reports_count() {
        let err = EsperarError::AmbiguousMatch {
            target: "tag=p".to_string(),
            count: 3,
        };
        assert!(err.to_string().contains("matched 3 elements"));
    }
}
