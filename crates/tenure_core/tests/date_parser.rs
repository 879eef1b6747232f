use chrono::{Datelike, NaiveDate};
use tenure_core::DateParser;

fn parse(text: &str) -> Option<NaiveDate> {
    DateParser.parse(text)
}

#[test]
fn month_and_year_lands_on_first_of_month() {
    let date = parse("Jan 2020").unwrap();
    assert_eq!(date.year(), 2020);
    assert_eq!(date.month0(), 0);
    assert_eq!(date.day(), 1);
}

#[test]
fn bare_year_assumes_mid_year() {
    let date = parse("2020").unwrap();
    assert_eq!(date.year(), 2020);
    assert_eq!(date.month0(), 6);
}

#[test]
fn month_words_are_case_insensitive_and_prefix_matched() {
    assert_eq!(parse("DECEMBER 2019").unwrap().month0(), 11);
    assert_eq!(parse("sept 2021").unwrap().month0(), 8);
    assert_eq!(parse("  Mar 2018  ").unwrap().month0(), 2);
}

#[test]
fn month_year_is_found_inside_longer_text() {
    let date = parse("Started Jun 2015 in London").unwrap();
    assert_eq!((date.year(), date.month0()), (2015, 5));
}

#[test]
fn garbage_yields_nothing() {
    assert_eq!(parse("not a date"), None);
    assert_eq!(parse(""), None);
    assert_eq!(parse("   "), None);
    assert_eq!(parse("Foo 2020"), None);
    assert_eq!(parse("20201"), None);
    assert_eq!(parse("3 yrs 2 mos"), None);
}
