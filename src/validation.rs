//! Validation results carrying errors, warnings and suggestions.
//!
//! Callers distinguish hard failures (`errors`) from advisory notes
//! (`warnings`, e.g. "this will create 800 subnets") without matching on a
//! result type. The message strings are displayed verbatim by consumers, so
//! their wording is part of the contract.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome of validating one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no errors were recorded. Warnings do not affect validity.
    pub is_valid: bool,
    /// Hard failures; `errors[0]` names the first violated rule.
    pub errors: Vec<String>,
    /// Advisory notes the caller may surface but can ignore.
    pub warnings: Vec<String>,
    /// Actionable fixes matching the recorded errors or warnings.
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no messages.
    pub fn ok() -> Self {
        ValidationResult {
            is_valid: true,
            ..Default::default()
        }
    }

    /// A failing result with a single error message.
    pub fn failed(error: impl Into<String>) -> Self {
        ValidationResult {
            is_valid: false,
            errors: vec![error.into()],
            ..Default::default()
        }
    }

    /// Record an error and mark the result invalid.
    pub fn push_error(&mut self, error: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(error.into());
    }

    /// Record an advisory warning.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Record a suggested fix.
    pub fn push_suggestion(&mut self, suggestion: impl Into<String>) {
        self.suggestions.push(suggestion.into());
    }

    /// Attach a suggestion, builder style.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.push_suggestion(suggestion);
        self
    }
}

impl From<&Error> for ValidationResult {
    fn from(err: &Error) -> Self {
        ValidationResult::failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_is_valid() {
        let v = ValidationResult::ok();
        assert!(v.is_valid);
        assert!(v.errors.is_empty());
    }

    #[test]
    fn test_failed_records_first_error() {
        let mut v = ValidationResult::failed("first");
        v.push_error("second");
        assert!(!v.is_valid);
        assert_eq!(v.errors[0], "first");
        assert_eq!(v.errors.len(), 2);
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut v = ValidationResult::ok();
        v.push_warning("advisory only");
        assert!(v.is_valid);
        assert_eq!(v.warnings.len(), 1);
    }
}
