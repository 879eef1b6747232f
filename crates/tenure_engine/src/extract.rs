//! Turning roster cards into raw records.
//!
//! Two strategies share the [`CardExtractor`] seam: [`CardTextExtractor`] reads
//! the caption printed on the card, [`ProfileFetchExtractor`] opens the member's
//! profile in a sub-view and scans it for an employment date range. Which one
//! runs is an explicit [`ExtractionMode`] choice, see [`Extraction::for_mode`].

use std::sync::LazyLock;

use regex::Regex;
use tenure_core::{ExtractionMode, ProfileFetchSettings, RawRecord, SelectorConfig};
use tenure_logging::{tenure_debug, tenure_warn};

use crate::rate_limit::Cooldown;
use crate::resolve::{profile_ref, resolve_text};
use crate::view::{DocumentView, OpenProfile, ProfileViewer, ViewElement};
use crate::wait::wait_until;

const MONTH: &str = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*";

/// "Month Year" or a bare year, whichever comes first in a caption.
static DATE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({MONTH}\s+\d{{4}})\b|\b(\d{{4}})\b"))
        .expect("date token pattern")
});

/// "Month Year - Present" or "Month Year - Month Year" (ASCII, en or em dash).
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH}\s+\d{{4}})\s*[-\u{{2013}}\u{{2014}}]\s*(present|{MONTH}\s+\d{{4}})\b"
    ))
    .expect("date range pattern")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("year pattern"));

#[async_trait::async_trait(?Send)]
pub trait CardExtractor<E: ViewElement> {
    /// `None` when the card lacks a profile link, a title or a start date.
    async fn extract(&mut self, card: &E, is_past: bool) -> Option<RawRecord>;
}

/// Reads title, name, location and the start date caption off the card.
#[derive(Debug, Clone)]
pub struct CardTextExtractor {
    selectors: SelectorConfig,
}

impl CardTextExtractor {
    pub fn new(selectors: SelectorConfig) -> Self {
        Self { selectors }
    }

    pub fn extract_card<E: ViewElement>(&self, card: &E, is_past: bool) -> Option<RawRecord> {
        let Some(profile_ref) = profile_ref(card, &self.selectors) else {
            tenure_debug!("Skipping card without profile link");
            return None;
        };
        let Some(title) = resolve_text(card, &self.selectors.title) else {
            tenure_debug!("Skipping {}: no title", profile_ref);
            return None;
        };
        let Some(start_date_text) = self.start_date_text(card) else {
            tenure_debug!("Skipping {}: no start date", profile_ref);
            return None;
        };

        Some(RawRecord {
            name: resolve_text(card, &self.selectors.name),
            title,
            start_date_text,
            end_date_text: None,
            profile_ref,
            location: self.location(card),
            is_past,
        })
    }

    fn start_date_text<E: ViewElement>(&self, card: &E) -> Option<String> {
        let caption = resolve_text(card, &self.selectors.tenure)?;
        date_token(&caption)
    }

    fn location<E: ViewElement>(&self, card: &E) -> Option<String> {
        card.select_first(&self.selectors.location)
            .map(|found| found.text())
            .filter(|text| !text.is_empty())
    }
}

pub fn date_token(caption: &str) -> Option<String> {
    let caps = DATE_TOKEN_RE.captures(caption)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

#[async_trait::async_trait(?Send)]
impl<E: ViewElement> CardExtractor<E> for CardTextExtractor {
    async fn extract(&mut self, card: &E, is_past: bool) -> Option<RawRecord> {
        self.extract_card(card, is_past)
    }
}

/// Dates found on a profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDates {
    pub start: String,
    /// `None` for "Present" and for year-only fallbacks.
    pub end: Option<String>,
}

/// First employment range in `text`, else the first year in
/// `min_year..=max_year`.
pub fn scan_profile_text(text: &str, min_year: i32, max_year: i32) -> Option<ProfileDates> {
    if let Some(caps) = DATE_RANGE_RE.captures(text) {
        let end = &caps[2];
        return Some(ProfileDates {
            start: caps[1].to_string(),
            end: (!end.eq_ignore_ascii_case("present")).then(|| end.to_string()),
        });
    }
    YEAR_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<i32>().ok())
        .find(|year| (min_year..=max_year).contains(year))
        .map(|year| ProfileDates {
            start: year.to_string(),
            end: None,
        })
}

/// Opens each member's profile through a [`ProfileViewer`] and scans it.
///
/// Opens are spaced by a cooldown and every opened sub-view is closed again,
/// whether a date was found, none was, or the fetch was dropped mid-scan.
pub struct ProfileFetchExtractor<P> {
    selectors: SelectorConfig,
    viewer: P,
    settings: ProfileFetchSettings,
    cooldown: Cooldown,
    current_year: i32,
}

impl<P: ProfileViewer> ProfileFetchExtractor<P> {
    pub fn new(
        selectors: SelectorConfig,
        viewer: P,
        settings: ProfileFetchSettings,
        current_year: i32,
    ) -> Self {
        Self {
            selectors,
            viewer,
            cooldown: Cooldown::new(settings.cooldown),
            settings,
            current_year,
        }
    }

    pub fn viewer(&self) -> &P {
        &self.viewer
    }
}

async fn scan_view<V: DocumentView>(
    view: &V,
    selectors: &SelectorConfig,
    settings: &ProfileFetchSettings,
    current_year: i32,
) -> Option<ProfileDates> {
    let rendered = wait_until(
        || view.query_first(&selectors.profile_ready).is_some(),
        settings.render_timeout,
        settings.poll_interval,
    )
    .await;
    if !rendered {
        tenure_warn!(
            "Profile not rendered after {:?}; scanning what is there",
            settings.render_timeout
        );
    }
    let text = view.query_first(&selectors.profile_text_root)?.text();
    scan_profile_text(&text, settings.min_plausible_year, current_year)
}

#[async_trait::async_trait(?Send)]
impl<E: ViewElement, P: ProfileViewer> CardExtractor<E> for ProfileFetchExtractor<P> {
    async fn extract(&mut self, card: &E, is_past: bool) -> Option<RawRecord> {
        let profile_ref = profile_ref(card, &self.selectors)?;
        let Some(title) = resolve_text(card, &self.selectors.title) else {
            tenure_debug!("Skipping {}: no title", profile_ref);
            return None;
        };

        self.cooldown.wait().await;
        let Some(view) = self.viewer.open(&profile_ref).await else {
            tenure_warn!("Could not open profile {}", profile_ref);
            return None;
        };
        let dates = {
            let opened = OpenProfile::new(&mut self.viewer, view);
            match opened.view() {
                Some(view) => {
                    scan_view(view, &self.selectors, &self.settings, self.current_year).await
                }
                None => None,
            }
        };

        let Some(dates) = dates else {
            tenure_debug!("No dates on profile {}", profile_ref);
            return None;
        };
        Some(RawRecord {
            name: resolve_text(card, &self.selectors.name),
            title,
            start_date_text: dates.start,
            end_date_text: if is_past { dates.end } else { None },
            profile_ref,
            location: card
                .select_first(&self.selectors.location)
                .map(|found| found.text())
                .filter(|text| !text.is_empty()),
            is_past,
        })
    }
}

/// The configured extraction strategy.
pub enum Extraction<P> {
    CardOnly(CardTextExtractor),
    ProfileFetch(ProfileFetchExtractor<P>),
}

impl<P: ProfileViewer> Extraction<P> {
    pub fn for_mode(
        mode: ExtractionMode,
        selectors: SelectorConfig,
        viewer: P,
        settings: ProfileFetchSettings,
        current_year: i32,
    ) -> Self {
        match mode {
            ExtractionMode::CardOnly => Extraction::CardOnly(CardTextExtractor::new(selectors)),
            ExtractionMode::ProfileFetch => Extraction::ProfileFetch(ProfileFetchExtractor::new(
                selectors,
                viewer,
                settings,
                current_year,
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl<E: ViewElement, P: ProfileViewer> CardExtractor<E> for Extraction<P> {
    async fn extract(&mut self, card: &E, is_past: bool) -> Option<RawRecord> {
        match self {
            Extraction::CardOnly(inner) => inner.extract(card, is_past).await,
            Extraction::ProfileFetch(inner) => inner.extract(card, is_past).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{date_token, scan_profile_text, ProfileDates};

    #[test]
    fn date_token_prefers_earliest_match() {
        assert_eq!(date_token("Since Jan 2019").as_deref(), Some("Jan 2019"));
        assert_eq!(date_token("joined 2018 (remote)").as_deref(), Some("2018"));
        assert_eq!(date_token("Sept 2020 - now").as_deref(), Some("Sept 2020"));
        assert_eq!(date_token("Software Engineer"), None);
        assert_eq!(date_token("12345"), None);
    }

    #[test]
    fn profile_range_with_present_has_no_end() {
        let dates = scan_profile_text("Acme · Full-time Mar 2019 – Present · 5 yrs", 1950, 2024);
        assert_eq!(
            dates,
            Some(ProfileDates {
                start: "Mar 2019".into(),
                end: None
            })
        );
    }

    #[test]
    fn profile_closed_range_keeps_end() {
        let dates = scan_profile_text("Jan 2015 - Dec 2018 Analyst", 1950, 2024);
        assert_eq!(dates.map(|d| d.end), Some(Some("Dec 2018".into())));
    }

    #[test]
    fn profile_year_fallback_skips_implausible_years() {
        let dates = scan_profile_text("Member #1234, class of 2031, since 2016", 1950, 2024);
        assert_eq!(dates.map(|d| d.start).as_deref(), Some("2016"));
        assert_eq!(scan_profile_text("nothing here", 1950, 2024), None);
    }
}
