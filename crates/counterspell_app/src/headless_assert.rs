//! Assertion helpers for headless scenario checks.

use serde::Serialize;
use std::collections::BTreeMap;

/// Snapshot of site-observable state used for headless assertions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticsSnapshot {
    pub elements: BTreeMap<String, DiagnosticsElement>,
}

impl DiagnosticsSnapshot {
    /// Record an element with text content
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.elements.insert(
            id.into(),
            DiagnosticsElement {
                text: Some(text.into()),
            },
        );
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id)?.text.as_deref()
    }
}

/// Minimal element representation for diagnostics checks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticsElement {
    pub text: Option<String>,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

pub fn evaluate_assert_exists(id: &str, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if snapshot.elements.contains_key(id) {
        AssertionResult::Passed
    } else {
        missing(id)
    }
}

pub fn evaluate_assert_text_contains(
    id: &str,
    expected: &str,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let Some(element) = snapshot.elements.get(id) else {
        return missing(id);
    };
    let Some(text) = element.text.as_deref() else {
        return AssertionResult::Failed {
            code: "missing_text".to_string(),
            message: format!("{id}: text not available"),
        };
    };
    if text.contains(expected) {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "text_mismatch".to_string(),
            message: format!("{id}: expected substring '{expected}', got '{text}'"),
        }
    }
}

fn missing(id: &str) -> AssertionResult {
    AssertionResult::Failed {
        code: "missing_element".to_string(),
        message: format!("{id}: element not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_contains() {
        let mut snapshot = DiagnosticsSnapshot::default();
        snapshot.insert("route", "/workshop");

        assert_eq!(
            evaluate_assert_text_contains("route", "work", &snapshot),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_text_contains("route", "news", &snapshot),
            AssertionResult::Failed { code, .. } if code == "text_mismatch"
        ));
        assert!(matches!(
            evaluate_assert_exists("carousel", &snapshot),
            AssertionResult::Failed { code, .. } if code == "missing_element"
        ));
    }
}
