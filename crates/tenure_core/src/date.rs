use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s+(\d{4})").expect("month-year pattern"));
static YEAR_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})$").expect("year pattern"));

/// Month names and abbreviations, 0-based. Order matters for prefix lookups.
const MONTHS: &[(&str, u32)] = &[
    ("jan", 0),
    ("january", 0),
    ("feb", 1),
    ("february", 1),
    ("mar", 2),
    ("march", 2),
    ("apr", 3),
    ("april", 3),
    ("may", 4),
    ("jun", 5),
    ("june", 5),
    ("jul", 6),
    ("july", 6),
    ("aug", 7),
    ("august", 7),
    ("sep", 8),
    ("september", 8),
    ("oct", 9),
    ("october", 9),
    ("nov", 10),
    ("november", 10),
    ("dec", 11),
    ("december", 11),
];

/// Month used when only the year is known.
const MID_YEAR_MONTH0: u32 = 6;

/// Heuristic parser for human-written date fragments such as `"Jan 2020"` or `"2020"`.
///
/// Results are always the first day of a month. Anything unrecognised yields `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateParser;

impl DateParser {
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(caps) = MONTH_YEAR_RE.captures(trimmed) {
            let month0 = month_index(&caps[1]);
            let year = caps[2].parse::<i32>().ok();
            if let (Some(month0), Some(year)) = (month0, year) {
                return NaiveDate::from_ymd_opt(year, month0 + 1, 1);
            }
        }

        let caps = YEAR_ONLY_RE.captures(trimmed)?;
        let year = caps[1].parse::<i32>().ok()?;
        NaiveDate::from_ymd_opt(year, MID_YEAR_MONTH0 + 1, 1)
    }
}

fn month_index(word: &str) -> Option<u32> {
    let normalized = word.trim().to_lowercase();
    if let Some((_, idx)) = MONTHS.iter().find(|(key, _)| *key == normalized) {
        return Some(*idx);
    }

    let prefix: String = normalized.chars().take(3).collect();
    MONTHS
        .iter()
        .find(|(key, _)| key.starts_with(&prefix))
        .map(|(_, idx)| *idx)
}
