//! Line recognizers for emails, URLs and phone numbers.
//!
//! Each recognizer answers "does this line contain one?". Lines are OCR
//! output, so matches are searched anywhere in the line, not anchored.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum digit count for a phone number (local numbers without area code).
pub const MIN_PHONE_DIGITS: usize = 7;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://|\bwww\.)\S+").expect("valid URL pattern")
});

// Optional "+CC", optional "(area)", then digits joined by at most one
// space, dot or hyphen. Digit totals are checked separately.
static PHONE_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+[0-9]{1,3}[ .-]?)?(?:\([0-9]{1,4}\)[ .-]?)?[0-9](?:[ .-]?[0-9])*")
        .expect("valid phone pattern")
});

/// Returns true if the line contains an email address.
pub fn is_email(line: &str) -> bool {
    EMAIL.is_match(line)
}

/// Returns true if the line contains an http(s) URL or a `www.` token.
pub fn is_url(line: &str) -> bool {
    URL.is_match(line)
}

/// Returns true if the line contains a digit group with at least
/// [`MIN_PHONE_DIGITS`] digits.
pub fn is_phone(line: &str) -> bool {
    PHONE_CANDIDATE
        .find_iter(line)
        .any(|m| digit_count(m.as_str()) >= MIN_PHONE_DIGITS)
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}
