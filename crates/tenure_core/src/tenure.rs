use chrono::{Datelike, NaiveDate};

use crate::validate::{calculate_confidence, is_valid, sanitize_text};
use crate::{DateParser, NormalizedRecord, RawRecord};

/// Turns raw records into normalized ones, measuring tenure against a fixed
/// evaluation date (the "month of evaluation" for records without an end).
#[derive(Debug, Clone)]
pub struct TenureCalculator {
    parser: DateParser,
    today: NaiveDate,
}

impl TenureCalculator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            parser: DateParser,
            today,
        }
    }

    /// Whole months between start and end (or today). Zero on any parse failure.
    pub fn tenure_months(&self, record: &RawRecord) -> u32 {
        let Some(start) = self.parser.parse(&record.start_date_text) else {
            return 0;
        };
        let end = match record.end_date_text.as_deref() {
            Some(text) if !text.trim().is_empty() => match self.parser.parse(text) {
                Some(end) => end,
                None => return 0,
            },
            _ => self.today,
        };

        months_between(start, end)
    }

    /// Validate, measure and score one record. Records with zero tenure are
    /// treated as unparseable and dropped.
    pub fn normalize(&self, record: RawRecord) -> Option<NormalizedRecord> {
        if !is_valid(&record) {
            return None;
        }

        let tenure_months = self.tenure_months(&record);
        if tenure_months == 0 {
            return None;
        }

        let confidence = calculate_confidence(&record);
        let raw = RawRecord {
            name: record.name.as_deref().map(sanitize_text),
            title: sanitize_text(&record.title),
            location: record.location.as_deref().map(sanitize_text),
            ..record
        };

        Some(NormalizedRecord {
            raw,
            tenure_months,
            tenure_years: round_to(f64::from(tenure_months) / 12.0, 2),
            confidence,
        })
    }

    /// Normalize in input order, skipping records that don't survive.
    pub fn normalize_all(&self, records: impl IntoIterator<Item = RawRecord>) -> Vec<NormalizedRecord> {
        records
            .into_iter()
            .filter_map(|record| self.normalize(record))
            .collect()
    }
}

fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() - start.year()) * 12 + (end.month0() as i32 - start.month0() as i32);
    months.max(0) as u32
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
