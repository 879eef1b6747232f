use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use tenure_core::{ProfileFetchSettings, StatisticsEngine};
use tenure_engine::{
    company_id, write_exports, AnalysisResult, Analyzer, AnalyzerConfig, Extraction, FileStore,
    SnapshotView, UNKNOWN_COMPANY_ID, UNKNOWN_COMPANY_NAME,
};
use tenure_logging::{tenure_info, tenure_warn};

use crate::cli::Cli;
use crate::inputs::{load_profiles, load_selectors, load_snapshots};
use crate::report::{format_summary, LogProgressSink};

pub async fn run(cli: Cli) -> Result<()> {
    let store = FileStore::new(&cli.store);
    let now = Utc::now();

    if cli.clear_cache {
        store.clear_cache().context("clearing cache")?;
        tenure_info!("Cache cleared");
    }
    if let Err(err) = store.cleanup(now.timestamp_millis()) {
        tenure_warn!("Cache cleanup failed: {}", err);
    }

    let settings = cli.apply_overrides(store.load_settings());
    if cli.save_settings {
        store.save_settings(&settings).context("saving settings")?;
    }

    if cli.snapshots.is_empty() {
        return match store.last_analysis().context("reading last analysis")? {
            Some(last) => {
                print!("{}", format_summary(&last));
                Ok(())
            }
            None => bail!("no snapshots given and no stored analysis to show"),
        };
    }

    let selectors = load_selectors(cli.selectors.as_deref())?;
    let pages = load_snapshots(&cli.snapshots)?;
    let mut view = SnapshotView::new(&pages);
    if let Some(location) = &cli.location {
        view = view.with_location(location.clone());
    }

    let result = match cached_result(&store, &cli, now.timestamp_millis()) {
        Some(cached) => cached,
        None => {
            let viewer = load_profiles(cli.profiles.as_deref())?;
            let mut extractor = Extraction::for_mode(
                settings.extraction_mode,
                selectors.clone(),
                viewer,
                ProfileFetchSettings::default(),
                now.year(),
            );
            let mut analyzer = Analyzer::new(AnalyzerConfig::new(settings, selectors))
                .with_sink(Box::new(LogProgressSink));
            let result = analyzer.analyze(&mut view, &mut extractor).await?;
            store.save_analysis(&result).context("storing analysis")?;
            result
        }
    };

    print!("{}", format_summary(&result));
    if let Some(out) = &cli.out {
        let summary = write_exports(out, &result).context("writing exports")?;
        println!("exported {}", summary.csv_path.display());
        println!("exported {}", summary.json_path.display());
    }
    Ok(())
}

/// Fresh cached records for the company behind `--location`, unless refreshing.
/// Without an identified company there is nothing safe to reuse.
fn cached_result(store: &FileStore, cli: &Cli, now_ms: i64) -> Option<AnalysisResult> {
    if cli.refresh {
        return None;
    }
    let id = company_id(cli.location.as_deref());
    if id == UNKNOWN_COMPANY_ID {
        return None;
    }
    let records = match store.cached_records(&id, now_ms) {
        Ok(records) => records?,
        Err(err) => {
            tenure_warn!("Ignoring unreadable cache: {}", err);
            return None;
        }
    };
    tenure_info!("Using cached records for {} (pass --refresh to re-analyze)", id);
    let company_name = store
        .last_analysis()
        .ok()
        .flatten()
        .filter(|last| last.company_id == id)
        .map(|last| last.company_name)
        .unwrap_or_else(|| UNKNOWN_COMPANY_NAME.to_string());
    Some(AnalysisResult {
        stats: StatisticsEngine.calculate(&records),
        company_id: id,
        company_name,
        timestamp: now_ms,
        records,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tenure_core::{Confidence, NormalizedRecord, RawRecord};
    use tempfile::TempDir;

    use super::*;

    const NOW: i64 = 1_718_452_800_000;

    fn analysis(company_id: &str, company_name: &str) -> AnalysisResult {
        let records = vec![NormalizedRecord {
            raw: RawRecord {
                name: Some("Ada".into()),
                title: "Engineer".into(),
                start_date_text: "Jan 2020".into(),
                end_date_text: None,
                profile_ref: "https://www.linkedin.com/in/ada".into(),
                location: None,
                is_past: false,
            },
            tenure_months: 53,
            tenure_years: 4.42,
            confidence: Confidence::High,
        }];
        AnalysisResult {
            company_id: company_id.into(),
            company_name: company_name.into(),
            timestamp: NOW,
            stats: StatisticsEngine.calculate(&records),
            records,
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn runs_without_location_never_reuse_cache() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        let store_arg = temp.path().to_str().unwrap();

        store.save_analysis(&analysis("acme", "Company A")).unwrap();
        // A cache written before unidentified runs were skipped.
        let cache_path = temp.path().join("cache.json");
        let legacy = fs::read_to_string(&cache_path)
            .unwrap()
            .replace("\"acme\"", "\"unknown\"");
        fs::write(&cache_path, legacy).unwrap();
        store.save_analysis(&analysis("unknown", "Company A")).unwrap();

        let second = cli(&["tenure", "company_b.html", "--store", store_arg]);
        assert!(cached_result(&store, &second, NOW + 1).is_none());
    }

    #[test]
    fn identified_company_is_served_from_cache() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        let store_arg = temp.path().to_str().unwrap();
        store.save_analysis(&analysis("acme", "Acme")).unwrap();

        let args = [
            "tenure",
            "acme.html",
            "--store",
            store_arg,
            "--location",
            "https://www.linkedin.com/company/acme/people/",
        ];
        let cached = cached_result(&store, &cli(&args), NOW + 1).unwrap();
        assert_eq!(cached.company_name, "Acme");
        assert_eq!(cached.records.len(), 1);

        let refresh: Vec<&str> = args.iter().copied().chain(["--refresh"]).collect();
        assert!(cached_result(&store, &cli(&refresh), NOW + 1).is_none());
    }
}
