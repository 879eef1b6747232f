use std::collections::HashSet;
use std::time::Duration;

/// Hard caps and pacing for one crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_pages: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
    pub max_expand_attempts: u32,
    pub expand_settle: Duration,
    pub past_filter_timeout: Duration,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_pages: 10,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
            ready_timeout: Duration::from_millis(3000),
            poll_interval: Duration::from_millis(100),
            max_expand_attempts: 20,
            expand_settle: Duration::from_millis(2000),
            past_filter_timeout: Duration::from_millis(5000),
        }
    }
}

impl CrawlLimits {
    /// `min(base * 1.5^(page - 1), max)`.
    pub fn backoff(&self, page_index: u32) -> Duration {
        let exponent = page_index.saturating_sub(1).min(64) as i32;
        let scaled = self.base_delay.as_secs_f64() * 1.5f64.powi(exponent);
        if scaled >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(scaled)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Collecting,
    RequestingMore,
    Waiting,
    Done(StopReason),
}

/// Every way a crawl ends. None of them is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    NoAdvanceControl,
    AdvanceDisabled,
    PageCapReached,
}

/// Bookkeeping for a single crawl: which profile references were seen, which
/// cards were kept (in encounter order) and which page we're on.
#[derive(Debug, Clone)]
pub struct CrawlState<C> {
    seen_profile_refs: HashSet<String>,
    page_index: u32,
    collected: Vec<C>,
    phase: CrawlPhase,
}

impl<C> Default for CrawlState<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CrawlState<C> {
    pub fn new() -> Self {
        Self {
            seen_profile_refs: HashSet::new(),
            page_index: 1,
            collected: Vec::new(),
            phase: CrawlPhase::Collecting,
        }
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn collected_len(&self) -> usize {
        self.collected.len()
    }

    pub fn has_seen(&self, profile_ref: &str) -> bool {
        self.seen_profile_refs.contains(profile_ref)
    }

    /// Record the cards visible right now. Returns how many were new.
    pub fn observe(&mut self, cards: impl IntoIterator<Item = (String, C)>) -> usize {
        let before = self.collected.len();
        for (profile_ref, card) in cards {
            if self.seen_profile_refs.insert(profile_ref) {
                self.collected.push(card);
            }
        }
        self.collected.len() - before
    }

    pub fn has_reached(&self, target: usize) -> bool {
        self.collected.len() >= target
    }

    pub fn begin_request(&mut self) {
        self.phase = CrawlPhase::RequestingMore;
    }

    pub fn begin_wait(&mut self) {
        self.phase = CrawlPhase::Waiting;
    }

    /// Move to the next page. Returns `false` (and finishes) once past `max_pages`.
    pub fn complete_advance(&mut self, max_pages: u32) -> bool {
        self.page_index += 1;
        if self.page_index > max_pages {
            self.finish(StopReason::PageCapReached);
            false
        } else {
            self.phase = CrawlPhase::Collecting;
            true
        }
    }

    pub fn finish(&mut self, reason: StopReason) {
        self.phase = CrawlPhase::Done(reason);
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.phase {
            CrawlPhase::Done(reason) => Some(reason),
            _ => None,
        }
    }

    /// The first `target` collected cards, in encounter order.
    pub fn into_collected(self, target: usize) -> Vec<C> {
        let mut collected = self.collected;
        collected.truncate(target);
        collected
    }
}
