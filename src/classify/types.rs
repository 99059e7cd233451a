//! Classification result types — ClassifiedResult and ScanFailure.
//!
//! Serialized with camelCase keys so a UI layer can render the preview
//! overlay straight from the JSON.

use crate::error::{CaptureError, ClassifyError, InferenceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category a recognized line lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCategory {
    Email,
    Link,
    Phone,
    Plain,
}

impl LineCategory {
    /// Evaluation order. The first category whose pattern matches wins.
    pub const PRIORITY: [LineCategory; 4] = [
        LineCategory::Email,
        LineCategory::Link,
        LineCategory::Phone,
        LineCategory::Plain,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LineCategory::Email => "email",
            LineCategory::Link => "link",
            LineCategory::Phone => "phone",
            LineCategory::Plain => "plain",
        }
    }
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which stage of the scan chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    Capture,
    Inference,
    InvalidInput,
}

/// Error indicator attached to a result (or to an `Idle` session notice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ScanFailure {
    pub fn capture(err: &CaptureError) -> Self {
        Self {
            kind: FailureKind::Capture,
            message: err.to_string(),
        }
    }

    pub fn inference(err: &InferenceError) -> Self {
        Self {
            kind: FailureKind::Inference,
            message: err.to_string(),
        }
    }

    pub fn invalid_input(err: &ClassifyError) -> Self {
        Self {
            kind: FailureKind::InvalidInput,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Recognized lines partitioned by category.
///
/// Without an error every input line sits in exactly one list, in input
/// order. With an error all four lists are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedResult {
    pub links: Vec<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub plain: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ScanFailure>,
}

impl ClassifiedResult {
    /// An error result: no lines, error indicator set.
    pub fn failed(failure: ScanFailure) -> Self {
        Self {
            error: Some(failure),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Lines stored under one category.
    pub fn lines(&self, category: LineCategory) -> &[String] {
        match category {
            LineCategory::Email => &self.emails,
            LineCategory::Link => &self.links,
            LineCategory::Phone => &self.phones,
            LineCategory::Plain => &self.plain,
        }
    }

    /// Number of classified lines across all categories.
    pub fn total(&self) -> usize {
        self.links.len() + self.emails.len() + self.phones.len() + self.plain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub(crate) fn push(&mut self, category: LineCategory, line: String) {
        match category {
            LineCategory::Email => self.emails.push(line),
            LineCategory::Link => self.links.push(line),
            LineCategory::Phone => self.phones.push(line),
            LineCategory::Plain => self.plain.push(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_has_no_lines() {
        let err = InferenceError::Engine("boom".to_string());
        let result = ClassifiedResult::failed(ScanFailure::inference(&err));
        assert!(result.is_error());
        assert!(result.is_empty());
        assert_eq!(result.error.unwrap().kind, FailureKind::Inference);
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_error() {
        let mut result = ClassifiedResult::default();
        result.push(LineCategory::Phone, "555-123-4567".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["phones"][0], "555-123-4567");
        assert!(json.get("error").is_none());

        let failed = ClassifiedResult::failed(ScanFailure::invalid_input(
            &ClassifyError::InvalidInput { index: 2 },
        ));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"]["kind"], "invalidInput");
        assert_eq!(json["error"]["message"], "recognized line 2 is missing");
    }
}
