use std::fmt::Write;

use chrono::{DateTime, Utc};
use tenure_engine::{AnalysisEvent, AnalysisResult, ProgressSink};
use tenure_logging::{tenure_debug, tenure_info};

/// Mirrors analysis progress into the log.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: AnalysisEvent) {
        match event {
            AnalysisEvent::RecordExtracted {
                roster,
                extracted,
                attempted,
            } => tenure_debug!("{:?} roster: {}/{} cards yielded records", roster, extracted, attempted),
            AnalysisEvent::CrawlFinished {
                roster,
                cards,
                pages,
                stop_reason,
            } => tenure_info!(
                "{:?} roster: {} cards over {} pages ({:?})",
                roster,
                cards,
                pages,
                stop_reason
            ),
            other => tenure_debug!("{:?}", other),
        }
    }
}

pub fn format_summary(result: &AnalysisResult) -> String {
    let stats = &result.stats;
    let analyzed_at = DateTime::<Utc>::from_timestamp_millis(result.timestamp)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| result.timestamp.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "{} ({})  analyzed {}", result.company_name, result.company_id, analyzed_at);
    let _ = writeln!(
        out,
        "records: {} ({} current, {} past)",
        stats.count, stats.current_count, stats.past_count
    );
    let _ = writeln!(
        out,
        "tenure (months): mean {:.1}  median {}  p25 {}  p75 {}  p90 {}  range {}-{}",
        stats.mean, stats.median, stats.p25, stats.p75, stats.p90, stats.min, stats.max
    );
    for (label, count) in stats.histogram.entries() {
        let _ = writeln!(out, "  {label:>6} {count:>4} {}", "#".repeat(count.min(60)));
    }
    let quality = &stats.data_quality;
    let _ = writeln!(
        out,
        "data quality: {} missing end dates, {} low-confidence dates",
        quality.missing_end_date, quality.ambiguous_dates
    );
    out
}

#[cfg(test)]
mod tests {
    use tenure_core::{Confidence, NormalizedRecord, RawRecord, StatisticsEngine};
    use tenure_engine::AnalysisResult;

    use super::format_summary;

    #[test]
    fn summary_lists_stats_and_histogram() {
        let records = vec![NormalizedRecord {
            raw: RawRecord {
                title: "Engineer".into(),
                start_date_text: "Jan 2020".into(),
                profile_ref: "https://example.com/in/a".into(),
                ..RawRecord::default()
            },
            tenure_months: 14,
            tenure_years: 1.17,
            confidence: Confidence::High,
        }];
        let result = AnalysisResult {
            company_id: "acme".into(),
            company_name: "Acme".into(),
            timestamp: 1_718_452_800_000,
            stats: StatisticsEngine.calculate(&records),
            records,
        };

        let summary = format_summary(&result);
        assert!(summary.starts_with("Acme (acme)  analyzed 2024-06-15 12:00 UTC\n"));
        assert!(summary.contains("records: 1 (1 current, 0 past)"));
        assert!(summary.contains("mean 14.0  median 14"));
        assert!(summary.contains("    1-2y    1 #\n"));
    }
}
