//! Pull typed values out of free-text user input.

use chrono::NaiveDate;
use leasebot_core::ExtractionError;
use leasebot_core::storage::MAX_SUMMARY_ID;
use regex_lite::Regex;
use std::sync::OnceLock;

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?\b\d+").expect("valid integer pattern"))
}

fn standalone_integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d+\b").expect("valid id pattern"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d{2}-\d{2}-\d{4}\b").expect("valid date pattern"))
}

/// The first run of digits that starts at a word boundary, with its sign.
///
/// `"about 8000km"` yields 8000, `"-500"` yields -500. Numbers too large for
/// `i64` count as no number at all. Range checks are left to the caller.
pub fn extract_integer(text: &str) -> Result<i64, ExtractionError> {
    integer_pattern()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or(ExtractionError::NoNumber)
}

/// The first `DD-MM-YYYY` token that is a real calendar date.
pub fn extract_date(text: &str) -> Result<NaiveDate, ExtractionError> {
    date_pattern()
        .find_iter(text)
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%d-%m-%Y").ok())
        .ok_or(ExtractionError::NoDate)
}

/// The first standalone number that can be a summary ID (below 100).
pub fn extract_summary_id(text: &str) -> Result<u32, ExtractionError> {
    standalone_integer_pattern()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .find(|id| *id <= MAX_SUMMARY_ID)
        .ok_or(ExtractionError::NoId)
}
