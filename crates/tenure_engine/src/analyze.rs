use std::fmt;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tenure_core::{
    CrawlLimits, NormalizedRecord, RateLimitSettings, RawRecord, SelectorConfig, Settings,
    Statistics, StatisticsEngine, TenureCalculator,
};
use tenure_logging::{tenure_info, tenure_warn};

use crate::crawl::PaginationCrawler;
use crate::extract::CardExtractor;
use crate::progress::{AnalysisEvent, NullProgressSink, ProgressSink, Roster};
use crate::rate_limit::RateLimiter;
use crate::resolve::resolve_view_text;
use crate::view::DocumentView;

pub const UNKNOWN_COMPANY_ID: &str = "unknown";
pub const UNKNOWN_COMPANY_NAME: &str = "Unknown Company";

static COMPANY_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/company/([^/?#]+)").expect("company path pattern")
});

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct AnalyzerConfig {
    pub settings: Settings,
    pub selectors: SelectorConfig,
    pub limits: CrawlLimits,
    pub rate_limit: RateLimitSettings,
    pub clock: Clock,
}

impl AnalyzerConfig {
    pub fn new(settings: Settings, selectors: SelectorConfig) -> Self {
        Self {
            settings,
            selectors,
            limits: CrawlLimits::default(),
            rate_limit: RateLimitSettings::default(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub company_id: String,
    pub company_name: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub records: Vec<NormalizedRecord>,
    pub stats: Statistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyStage {
    Extraction,
    Normalization,
}

impl fmt::Display for EmptyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyStage::Extraction => f.write_str("no cards yielded a record"),
            EmptyStage::Normalization => f.write_str("no record survived validation"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no usable tenure data: {stage}")]
    NoUsableData { stage: EmptyStage },
}

/// Runs one analysis end to end against a roster view.
pub struct Analyzer {
    config: AnalyzerConfig,
    rate_limiter: RateLimiter,
    sink: Box<dyn ProgressSink>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            rate_limiter: RateLimiter::new(config.rate_limit),
            config,
            sink: Box::new(NullProgressSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub async fn analyze<V, X>(
        &mut self,
        view: &mut V,
        extractor: &mut X,
    ) -> Result<AnalysisResult, AnalysisError>
    where
        V: DocumentView,
        X: CardExtractor<V::Element>,
    {
        let now = (self.config.clock)();
        let target = self.config.settings.max_records;
        let company_id = company_id(view.location().as_deref());
        let company_name = resolve_view_text(view, &self.config.selectors.company_name)
            .unwrap_or_else(|| UNKNOWN_COMPANY_NAME.to_string());
        tenure_info!("Analyzing {} ({}), target {}", company_name, company_id, target);
        self.sink.emit(AnalysisEvent::Started {
            company_id: company_id.clone(),
            target,
        });

        let crawler = PaginationCrawler::new(&self.config.selectors, self.config.limits);
        let unique_cards = crawler.expand_to_minimum(view, target).await;
        self.sink.emit(AnalysisEvent::Expanded { unique_cards });

        let mut raw = Vec::new();
        let current = crawler.collect(view, target).await;
        self.sink.emit(AnalysisEvent::CrawlFinished {
            roster: Roster::Current,
            cards: current.cards.len(),
            pages: current.pages_visited,
            stop_reason: current.stop_reason,
        });
        extract_cards(
            &current.cards,
            Roster::Current,
            extractor,
            &mut self.rate_limiter,
            self.sink.as_ref(),
            &mut raw,
        )
        .await;

        if self.config.settings.include_past_records && crawler.open_past_roster(view).await {
            let past = crawler.collect(view, target).await;
            self.sink.emit(AnalysisEvent::CrawlFinished {
                roster: Roster::Past,
                cards: past.cards.len(),
                pages: past.pages_visited,
                stop_reason: past.stop_reason,
            });
            extract_cards(
                &past.cards,
                Roster::Past,
                extractor,
                &mut self.rate_limiter,
                self.sink.as_ref(),
                &mut raw,
            )
            .await;
        }

        if raw.is_empty() {
            tenure_warn!("No records extracted for {}", company_id);
            return Err(AnalysisError::NoUsableData {
                stage: EmptyStage::Extraction,
            });
        }

        let records = TenureCalculator::new(now.date_naive()).normalize_all(raw);
        if records.is_empty() {
            tenure_warn!("All extracted records for {} were rejected", company_id);
            return Err(AnalysisError::NoUsableData {
                stage: EmptyStage::Normalization,
            });
        }

        let stats = StatisticsEngine.calculate(&records);
        tenure_info!(
            "Analysis of {} complete: {} records, mean tenure {} months",
            company_id,
            stats.count,
            stats.mean
        );
        self.sink.emit(AnalysisEvent::Completed {
            records: records.len(),
        });

        Ok(AnalysisResult {
            company_id,
            company_name,
            timestamp: now.timestamp_millis(),
            records,
            stats,
        })
    }
}

async fn extract_cards<E, X>(
    cards: &[E],
    roster: Roster,
    extractor: &mut X,
    limiter: &mut RateLimiter,
    sink: &dyn ProgressSink,
    out: &mut Vec<RawRecord>,
) where
    X: CardExtractor<E>,
    E: crate::view::ViewElement,
{
    let is_past = roster == Roster::Past;
    let mut extracted = 0;
    for (attempted, card) in cards.iter().enumerate() {
        limiter.throttle().await;
        if let Some(record) = extractor.extract(card, is_past).await {
            out.push(record);
            extracted += 1;
        }
        sink.emit(AnalysisEvent::RecordExtracted {
            roster,
            extracted,
            attempted: attempted + 1,
        });
    }
}

/// Identifier from a `/company/<id>` location, or `"unknown"`.
pub fn company_id(location: Option<&str>) -> String {
    location
        .and_then(|loc| COMPANY_PATH_RE.captures(loc))
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| UNKNOWN_COMPANY_ID.to_string())
}
