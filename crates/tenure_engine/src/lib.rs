//! Tenure engine: view-driven crawling, extraction, persistence and export.
mod analyze;
mod crawl;
mod export;
mod extract;
mod filename;
mod persist;
mod progress;
mod rate_limit;
mod resolve;
mod store;
mod view;
mod wait;

pub use analyze::{
    company_id, AnalysisError, AnalysisResult, Analyzer, AnalyzerConfig, Clock, EmptyStage,
    UNKNOWN_COMPANY_ID, UNKNOWN_COMPANY_NAME,
};
pub use crawl::{find_advance_control, find_expand_control, is_enabled, CrawlOutcome, PaginationCrawler};
pub use export::{analysis_to_json, records_to_csv, write_exports, ExportError, ExportSummary};
pub use extract::{
    date_token, scan_profile_text, CardExtractor, CardTextExtractor, Extraction, ProfileDates,
    ProfileFetchExtractor,
};
pub use filename::export_stem;
pub use persist::{ensure_dir, write_atomic, PersistError};
pub use progress::{AnalysisEvent, ChannelProgressSink, NullProgressSink, ProgressSink, Roster};
pub use rate_limit::{Cooldown, RateLimiter};
pub use resolve::{normalize_profile_ref, profile_ref, resolve_text, resolve_view_text, visible_cards};
pub use store::{CacheEntry, FileStore, StoreError, CACHE_DURATION_MS, MAX_CACHE_AGE_MS};
pub use view::{
    profile_slug, DocumentView, HtmlElement, NoProfileViewer, OpenProfile, ProfileViewer,
    SnapshotProfileViewer, SnapshotView, ViewElement,
};
pub use wait::{wait_for_ready, wait_until};
