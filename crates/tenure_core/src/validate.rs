use std::sync::LazyLock;

use regex::Regex;

use crate::{Confidence, RawRecord};

static BARE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("bare year pattern"));

const YEAR_ONLY_PENALTY: i32 = 20;
const MISSING_END_PENALTY: i32 = 30;
const MISSING_TITLE_PENALTY: i32 = 10;

/// A record is usable when every required text field is present.
pub fn is_valid(record: &RawRecord) -> bool {
    !record.title.is_empty() && !record.start_date_text.is_empty() && !record.profile_ref.is_empty()
}

/// Score how much date precision the record carries.
///
/// Starts at 100 and subtracts for a year-only start, a past record without an
/// end date and a missing title. A missing start date is always `Low`.
pub fn calculate_confidence(record: &RawRecord) -> Confidence {
    if record.start_date_text.is_empty() {
        return Confidence::Low;
    }

    let mut score = 100;
    if BARE_YEAR_RE.is_match(&record.start_date_text) {
        score -= YEAR_ONLY_PENALTY;
    }
    if record.is_past && record.end_date_text.as_deref().is_none_or(str::is_empty) {
        score -= MISSING_END_PENALTY;
    }
    // Unreachable for records that passed `is_valid`.
    if record.title.is_empty() {
        score -= MISSING_TITLE_PENALTY;
    }

    Confidence::from_score(score)
}

/// Trim and drop angle brackets so scraped text can't smuggle markup downstream.
pub fn sanitize_text(input: &str) -> String {
    input.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect()
}
