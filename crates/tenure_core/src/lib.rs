//! Tenure core: pure record model, date heuristics, scoring and statistics.
mod crawl;
mod date;
mod selectors;
mod settings;
mod stats;
mod tenure;
mod types;
mod validate;

pub use crawl::{CrawlLimits, CrawlPhase, CrawlState, StopReason};
pub use date::DateParser;
pub use selectors::{resolve_with, SelectorConfig, SelectorSet};
pub use settings::{ExtractionMode, ProfileFetchSettings, RateLimitSettings, Settings};
pub use stats::StatisticsEngine;
pub use tenure::TenureCalculator;
pub use types::{
    Confidence, DataQuality, Histogram, HistogramBucket, NormalizedRecord, RawRecord, Statistics,
};
pub use validate::{calculate_confidence, is_valid, sanitize_text};
