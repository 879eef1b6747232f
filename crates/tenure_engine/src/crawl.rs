use tenure_core::{CrawlLimits, CrawlState, SelectorConfig, StopReason};
use tenure_logging::{tenure_debug, tenure_info, tenure_warn};
use tokio::time::sleep;

use crate::resolve::{profile_ref, visible_cards};
use crate::view::{DocumentView, ViewElement};
use crate::wait::wait_for_ready;

/// What a crawl gathered and why it ended.
#[derive(Debug, Clone)]
pub struct CrawlOutcome<E> {
    pub cards: Vec<E>,
    pub pages_visited: u32,
    pub stop_reason: StopReason,
}

/// Walks a paginated (or "show more") roster until enough unique cards are
/// collected or the view can't produce more.
pub struct PaginationCrawler<'a> {
    selectors: &'a SelectorConfig,
    limits: CrawlLimits,
}

impl<'a> PaginationCrawler<'a> {
    pub fn new(selectors: &'a SelectorConfig, limits: CrawlLimits) -> Self {
        Self { selectors, limits }
    }

    pub async fn collect<V: DocumentView>(
        &self,
        view: &mut V,
        target: usize,
    ) -> CrawlOutcome<V::Element> {
        let mut state = CrawlState::new();
        let mut pages_visited = 0;
        tenure_info!(
            "Crawl started: target={} max_pages={}",
            target,
            self.limits.max_pages
        );

        let stop_reason = loop {
            let added = state.observe(self.keyed_cards(view));
            pages_visited += 1;
            tenure_debug!(
                "Page {}: {} new cards, {} collected",
                state.page_index(),
                added,
                state.collected_len()
            );
            if state.has_reached(target) {
                break StopReason::TargetReached;
            }

            let Some(control) = find_advance_control(view, self.selectors) else {
                break StopReason::NoAdvanceControl;
            };
            if !is_enabled(&control) {
                break StopReason::AdvanceDisabled;
            }

            state.begin_request();
            view.activate(&control).await;
            state.begin_wait();
            sleep(self.limits.backoff(state.page_index())).await;
            self.settle(view).await;

            if !state.complete_advance(self.limits.max_pages) {
                break StopReason::PageCapReached;
            }
        };
        state.finish(stop_reason);

        tenure_info!(
            "Crawl finished: {} cards over {} pages ({:?})",
            state.collected_len().min(target),
            pages_visited,
            stop_reason
        );
        CrawlOutcome {
            cards: state.into_collected(target),
            pages_visited,
            stop_reason,
        }
    }

    /// Presses "show more" until `min_cards` unique cards are visible, no
    /// control remains, or the attempt budget runs out. Returns the unique count.
    pub async fn expand_to_minimum<V: DocumentView>(&self, view: &mut V, min_cards: usize) -> usize {
        let mut seen: CrawlState<()> = CrawlState::new();
        let mut attempts = 0;
        loop {
            let refs: Vec<_> = self.keyed_cards(view).into_iter().map(|(r, _)| (r, ())).collect();
            seen.observe(refs);
            if seen.has_reached(min_cards) || attempts >= self.limits.max_expand_attempts {
                break;
            }
            let Some(control) = find_expand_control(view, self.selectors) else {
                tenure_debug!("No expand control; {} cards visible", seen.collected_len());
                break;
            };
            view.activate(&control).await;
            attempts += 1;
            sleep(self.limits.expand_settle).await;
            self.settle(view).await;
        }
        tenure_info!(
            "Expanded roster to {} cards in {} attempts",
            seen.collected_len(),
            attempts
        );
        seen.collected_len()
    }

    /// Opens the former-members roster, if the view offers it.
    pub async fn open_past_roster<V: DocumentView>(&self, view: &mut V) -> bool {
        let Some(filter) = view.query_first(&self.selectors.past_filter) else {
            tenure_warn!("No past-members filter found");
            return false;
        };
        view.activate(&filter).await;
        let ready = wait_for_ready(
            view,
            &self.selectors.loading_indicator,
            self.limits.past_filter_timeout,
            self.limits.poll_interval,
        )
        .await;
        if !ready {
            tenure_warn!("Past-members roster still loading; reading it anyway");
        }
        true
    }

    fn keyed_cards<V: DocumentView>(&self, view: &V) -> Vec<(String, V::Element)> {
        visible_cards(view, &self.selectors.card)
            .into_iter()
            .filter_map(|card| profile_ref(&card, self.selectors).map(|r| (r, card)))
            .collect()
    }

    async fn settle<V: DocumentView>(&self, view: &V) {
        let ready = wait_for_ready(
            view,
            &self.selectors.loading_indicator,
            self.limits.ready_timeout,
            self.limits.poll_interval,
        )
        .await;
        if !ready {
            tenure_debug!("Content not ready after {:?}; continuing", self.limits.ready_timeout);
        }
    }
}

/// Next-page controls first, then "show more" style expansion.
pub fn find_advance_control<V: DocumentView>(view: &V, selectors: &SelectorConfig) -> Option<V::Element> {
    selectors
        .next_page
        .iter()
        .find_map(|query| view.query_first(query))
        .or_else(|| find_expand_control(view, selectors))
}

pub fn find_expand_control<V: DocumentView>(view: &V, selectors: &SelectorConfig) -> Option<V::Element> {
    view.query_all(&selectors.button)
        .into_iter()
        .find(|button| {
            let text = button.text().to_lowercase();
            selectors
                .expand_phrases
                .iter()
                .any(|phrase| text.contains(phrase.to_lowercase().as_str()))
        })
        .or_else(|| {
            selectors
                .expand_more
                .iter()
                .find_map(|query| view.query_first(query))
        })
}

pub fn is_enabled<E: ViewElement>(control: &E) -> bool {
    control.attr("disabled").is_none() && !control.has_class("disabled")
}
