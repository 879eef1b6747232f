use tenure_core::{resolve_with, SelectorConfig, SelectorSet};
use tenure_logging::{tenure_debug, tenure_warn};
use url::Url;

use crate::view::{DocumentView, ViewElement};

/// Text of the first query in `set` that finds non-empty text under `element`.
pub fn resolve_text<E: ViewElement>(element: &E, set: &SelectorSet) -> Option<String> {
    resolve_with(set, |query| element.select_first(query).map(|found| found.text()))
}

/// Same as [`resolve_text`], against the whole view.
pub fn resolve_view_text<V: DocumentView>(view: &V, set: &SelectorSet) -> Option<String> {
    resolve_with(set, |query| view.query_first(query).map(|found| found.text()))
}

/// Cards from the first query in `set` that yields any.
pub fn visible_cards<V: DocumentView>(view: &V, set: &SelectorSet) -> Vec<V::Element> {
    for query in set.queries() {
        let found = view.query_all(query);
        if !found.is_empty() {
            tenure_debug!("{} cards matched {:?}", found.len(), query);
            return found;
        }
    }
    tenure_warn!("No cards matched any of {} card queries", set.queries().count());
    Vec::new()
}

/// The card's profile link, absolute and without query or fragment.
pub fn profile_ref<E: ViewElement>(card: &E, config: &SelectorConfig) -> Option<String> {
    let href = card.select_first(&config.profile_link)?.attr("href")?;
    normalize_profile_ref(href.trim(), &config.profile_base_url)
}

pub fn normalize_profile_ref(href: &str, base_url: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    let mut url = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => Url::parse(base_url).ok()?.join(href).ok()?,
    };
    url.set_query(None);
    url.set_fragment(None);
    Some(url.into())
}
