//! Text-line classification — sorts OCR lines into links, emails, phones
//! and plain text.
//!
//! Each line is checked against the recognizers in priority order
//! (email, URL, phone) and lands in the first category that matches.
//! Classification is pure: the same input always gives the same result.

pub mod patterns;
pub mod types;

pub use types::{ClassifiedResult, FailureKind, LineCategory, ScanFailure};

use crate::error::ClassifyError;
use serde::{Deserialize, Serialize};

/// Lines longer than this are not pattern-matched.
pub const DEFAULT_MAX_LINE_BYTES: usize = 4096;

/// Classifier limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    pub max_line_bytes: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Classify lines with the default limits.
pub fn classify<I>(lines: I) -> ClassifiedResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    classify_with(lines, &ClassifierConfig::default())
}

/// Partition lines into categories, preserving input order within each.
pub fn classify_with<I>(lines: I, config: &ClassifierConfig) -> ClassifiedResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut result = ClassifiedResult::default();
    for line in lines {
        let line = line.as_ref();
        result.push(categorize_with(line, config), line.to_string());
    }
    result
}

/// Classify raw engine output, where a bridged engine may report a missing
/// line. Any missing line rejects the whole batch.
pub fn classify_recognized(
    lines: &[Option<String>],
    config: &ClassifierConfig,
) -> Result<ClassifiedResult, ClassifyError> {
    if let Some(index) = lines.iter().position(Option::is_none) {
        return Err(ClassifyError::InvalidInput { index });
    }
    Ok(classify_with(lines.iter().flatten(), config))
}

/// Category for a single line with the default limits.
pub fn categorize(line: &str) -> LineCategory {
    categorize_with(line, &ClassifierConfig::default())
}

/// Category for a single line.
///
/// Oversized lines are routed to `Plain` with a warning instead of being
/// matched, so one bad line never aborts a batch.
pub fn categorize_with(line: &str, config: &ClassifierConfig) -> LineCategory {
    if line.len() > config.max_line_bytes {
        log::warn!(
            "[CLASSIFY] Line of {} bytes exceeds limit of {} — treating as plain text",
            line.len(),
            config.max_line_bytes
        );
        return LineCategory::Plain;
    }

    LineCategory::PRIORITY
        .into_iter()
        .find(|category| matches_category(*category, line))
        .unwrap_or(LineCategory::Plain)
}

fn matches_category(category: LineCategory, line: &str) -> bool {
    match category {
        LineCategory::Email => patterns::is_email(line),
        LineCategory::Link => patterns::is_url(line),
        LineCategory::Phone => patterns::is_phone(line),
        LineCategory::Plain => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_result() {
        let result = classify(Vec::<String>::new());
        assert_eq!(result, ClassifiedResult::default());
    }

    #[test]
    fn single_email() {
        let result = classify(["a@b.com"]);
        assert_eq!(result.emails, vec!["a@b.com"]);
        assert!(result.links.is_empty());
        assert!(result.phones.is_empty());
        assert!(result.plain.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn mixed_lines() {
        let result = classify(["https://x.com", "call 555-123-4567", "hello world"]);
        assert_eq!(result.links, vec!["https://x.com"]);
        assert_eq!(result.phones, vec!["call 555-123-4567"]);
        assert_eq!(result.plain, vec!["hello world"]);
        assert!(result.emails.is_empty());
    }

    #[test]
    fn email_beats_url() {
        assert_eq!(categorize("contact@www.site.com"), LineCategory::Email);
    }

    #[test]
    fn email_beats_phone_digits_in_local_part() {
        assert_eq!(categorize("5551234567@sms.example.com"), LineCategory::Email);
    }

    #[test]
    fn url_beats_phone() {
        assert_eq!(
            categorize("https://example.com/orders/5551234567"),
            LineCategory::Link
        );
    }

    #[test]
    fn oversized_line_is_plain() {
        let config = ClassifierConfig { max_line_bytes: 8 };
        assert_eq!(categorize_with("a@b.com", &config), LineCategory::Email);
        assert_eq!(
            categorize_with("mail a@b.com", &config),
            LineCategory::Plain
        );
    }

    #[test]
    fn missing_line_rejects_batch() {
        let lines = vec![Some("a@b.com".to_string()), None, Some("hi".to_string())];
        let err = classify_recognized(&lines, &ClassifierConfig::default()).unwrap_err();
        assert_eq!(err, ClassifyError::InvalidInput { index: 1 });
    }

    #[test]
    fn recognized_lines_classify_like_plain_strings() {
        let lines = vec![Some("www.rust-lang.org".to_string()), Some("ok".to_string())];
        let result = classify_recognized(&lines, &ClassifierConfig::default()).unwrap();
        assert_eq!(result, classify(["www.rust-lang.org", "ok"]));
    }
}
