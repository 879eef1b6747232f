use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tenure_core::{calculate_confidence, is_valid, Confidence, RawRecord, TenureCalculator};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn record(start: &str, end: Option<&str>, is_past: bool) -> RawRecord {
    RawRecord {
        name: Some("Ada".to_string()),
        title: "Engineer".to_string(),
        start_date_text: start.to_string(),
        end_date_text: end.map(str::to_string),
        profile_ref: "https://www.linkedin.com/in/ada".to_string(),
        location: None,
        is_past,
    }
}

#[test]
fn closed_range_counts_whole_months() {
    let calc = TenureCalculator::new(today());
    let months = calc.tenure_months(&record("Jan 2020", Some("Dec 2022"), true));
    assert_eq!(months, 35);
}

#[test]
fn open_range_runs_to_evaluation_month() {
    let calc = TenureCalculator::new(today());
    assert_eq!(calc.tenure_months(&record("Jan 2024", None, false)), 5);
    // Year-only start is July.
    assert_eq!(calc.tenure_months(&record("2022", None, false)), 23);
}

#[test]
fn unparseable_or_inverted_dates_are_zero() {
    let calc = TenureCalculator::new(today());
    assert_eq!(calc.tenure_months(&record("whenever", None, false)), 0);
    assert_eq!(calc.tenure_months(&record("Jan 2020", Some("later"), true)), 0);
    assert_eq!(calc.tenure_months(&record("Jan 2030", None, false)), 0);
}

#[test]
fn normalize_drops_zero_tenure() {
    let calc = TenureCalculator::new(today());
    assert!(calc.normalize(record("Jun 2024", None, false)).is_none());
    assert!(calc.normalize(record("garbage", None, false)).is_none());
}

#[test]
fn normalize_drops_invalid_records() {
    let calc = TenureCalculator::new(today());
    let mut missing_title = record("Jan 2020", None, false);
    missing_title.title.clear();
    assert!(!is_valid(&missing_title));
    assert!(calc.normalize(missing_title).is_none());

    let mut missing_ref = record("Jan 2020", None, false);
    missing_ref.profile_ref.clear();
    assert!(calc.normalize(missing_ref).is_none());
}

#[test]
fn normalize_fills_tenure_fields_and_sanitizes_text() {
    let calc = TenureCalculator::new(today());
    let mut raw = record("Jan 2020", Some("Dec 2022"), true);
    raw.title = "  <Staff> Engineer ".to_string();
    raw.location = Some(" Oslo ".to_string());

    let normalized = calc.normalize(raw).unwrap();
    assert_eq!(normalized.tenure_months, 35);
    assert_eq!(normalized.tenure_years, 2.92);
    assert_eq!(normalized.confidence, Confidence::High);
    assert_eq!(normalized.raw.title, "Staff Engineer");
    assert_eq!(normalized.raw.location.as_deref(), Some("Oslo"));
    assert_eq!(normalized.raw.name.as_deref(), Some("Ada"));
}

#[test]
fn normalize_all_preserves_input_order() {
    let calc = TenureCalculator::new(today());
    let mut first = record("Jan 2020", None, false);
    first.profile_ref = "a".to_string();
    let dropped = record("nope", None, false);
    let mut second = record("Jan 2010", None, false);
    second.profile_ref = "b".to_string();

    let out = calc.normalize_all(vec![first, dropped, second]);
    let refs: Vec<_> = out.iter().map(|r| r.raw.profile_ref.as_str()).collect();
    assert_eq!(refs, vec!["a", "b"]);
}

#[test]
fn confidence_penalizes_year_only_and_open_past_records() {
    assert_eq!(calculate_confidence(&record("2020", None, true)), Confidence::Medium);
    assert_eq!(
        calculate_confidence(&record("Jan 2020", Some("Dec 2022"), true)),
        Confidence::High
    );
    assert_eq!(calculate_confidence(&record("2020", None, false)), Confidence::High);
    assert_eq!(calculate_confidence(&record("Jan 2020", None, true)), Confidence::Medium);
}

#[test]
fn confidence_is_low_without_start_date() {
    assert_eq!(calculate_confidence(&record("", None, false)), Confidence::Low);
}

#[test]
fn confidence_bottoms_out_when_every_penalty_applies() {
    let mut raw = record("2020", None, true);
    raw.title.clear();
    // 100 - 20 - 30 - 10 = 40
    assert_eq!(calculate_confidence(&raw), Confidence::Low);
}
