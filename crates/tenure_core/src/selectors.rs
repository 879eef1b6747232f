use serde::{Deserialize, Serialize};

/// One primary query plus ordered fallbacks. Earlier entries win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    pub primary: String,
    #[serde(default)]
    pub fallback: Vec<String>,
}

impl SelectorSet {
    pub fn new(primary: impl Into<String>, fallback: &[&str]) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Queries in priority order.
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.fallback.iter().map(String::as_str))
    }
}

/// Resolve a field by trying each query in priority order.
///
/// `resolve_one` answers a single query against whatever node the caller has in
/// hand. The first non-empty trimmed answer wins; a total miss is `None`.
pub fn resolve_with<F>(set: &SelectorSet, mut resolve_one: F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    set.queries().find_map(|query| {
        resolve_one(query)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    })
}

/// Every query string the pipeline issues against the source view.
///
/// Swapping this value adapts the pipeline to markup drift without code changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub card: SelectorSet,
    pub name: SelectorSet,
    pub title: SelectorSet,
    pub tenure: SelectorSet,
    pub location: String,
    pub profile_link: String,
    pub profile_base_url: String,
    pub next_page: Vec<String>,
    pub expand_more: Vec<String>,
    pub expand_phrases: Vec<String>,
    pub button: String,
    pub loading_indicator: String,
    pub past_filter: String,
    pub company_name: SelectorSet,
    pub profile_ready: String,
    pub profile_text_root: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: SelectorSet::new(
                r#"[data-entity-urn*="company-employee"]"#,
                &[
                    ".org-people-profile-card",
                    r#"[data-control-name="people_profile_card"]"#,
                    "li.ember-view.org-people-profile-card__profile-card",
                ],
            ),
            name: SelectorSet::new(
                ".org-people-profile-card__profile-title",
                &[
                    r#"[aria-label*="View"]"#,
                    "a.app-aware-link",
                    ".artdeco-entity-lockup__title",
                ],
            ),
            title: SelectorSet::new(
                ".artdeco-entity-lockup__subtitle",
                &[
                    ".t-14.t-black--light",
                    ".org-people-profile-card__profile-info",
                    ".lt-line-clamp--single-line",
                ],
            ),
            tenure: SelectorSet::new(
                ".artdeco-entity-lockup__caption",
                &[".t-12.t-black--light", "time", ".lt-line-clamp"],
            ),
            location: r#"[class*="location"]"#.to_string(),
            profile_link: r#"a[href*="/in/"]"#.to_string(),
            profile_base_url: "https://www.linkedin.com".to_string(),
            next_page: vec![
                r#"button[aria-label*="Next"]"#.to_string(),
                r#"button[aria-label*="next"]"#.to_string(),
                ".artdeco-pagination__button--next".to_string(),
                "button.pagination__next".to_string(),
            ],
            expand_more: vec![
                r#"button[aria-label*="Show more"]"#.to_string(),
                r#"button[aria-label*="show more"]"#.to_string(),
            ],
            expand_phrases: vec![
                "show more".to_string(),
                "see more".to_string(),
                "load more".to_string(),
            ],
            button: "button".to_string(),
            loading_indicator: ".artdeco-spinner".to_string(),
            past_filter: r#"[aria-label*="Past"]"#.to_string(),
            company_name: SelectorSet::new(".org-top-card-summary__title", &["h1"]),
            profile_ready: "main".to_string(),
            profile_text_root: "body".to_string(),
        }
    }
}
