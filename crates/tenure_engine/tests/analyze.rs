use std::sync::{mpsc, Arc};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tenure_core::{
    Confidence, DataQuality, ExtractionMode, ProfileFetchSettings, SelectorConfig, Settings,
};
use tenure_engine::{
    AnalysisError, AnalysisEvent, Analyzer, AnalyzerConfig, CardTextExtractor, ChannelProgressSink,
    EmptyStage, Extraction, Roster, SnapshotProfileViewer, SnapshotView,
};

const PAST_FILTER: &str = r#"<button aria-label="Past employees">Past</button>"#;

fn card(slug: &str, title: &str, caption: &str) -> String {
    format!(
        r#"<li class="org-people-profile-card">
             <a href="/in/{slug}/"><div class="artdeco-entity-lockup__title">{slug}</div></a>
             <div class="artdeco-entity-lockup__subtitle">{title}</div>
             <div class="artdeco-entity-lockup__caption">{caption}</div>
           </li>"#
    )
}

fn roster(cards: &[String], extra: &str) -> String {
    format!(
        r#"<html><body><h1 class="org-top-card-summary__title">Acme Corp</h1>
           <ul>{}</ul>{extra}</body></html>"#,
        cards.concat()
    )
}

fn config(settings: Settings) -> AnalyzerConfig {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    AnalyzerConfig::new(settings, SelectorConfig::default()).with_clock(Arc::new(move || now))
}

fn acme_view() -> SnapshotView {
    SnapshotView::new([
        roster(
            &[
                card("ada", "Engineer", "Jan 2020"),
                card("bob", "Designer", "Jun 2022"),
                card("cy", "Analyst", "2023"),
            ],
            PAST_FILTER,
        ),
        roster(
            &[
                card("dee", "Engineer", "2015"),
                card("eve", "Manager", "Mar 2016"),
            ],
            "",
        ),
    ])
    .with_location("https://www.linkedin.com/company/acme/people/")
}

fn settings(max_records: usize, include_past_records: bool) -> Settings {
    Settings {
        max_records,
        include_past_records,
        extraction_mode: ExtractionMode::CardOnly,
    }
}

#[tokio::test(start_paused = true)]
async fn analyzes_current_and_past_rosters() {
    tenure_logging::initialize_for_tests();
    let mut analyzer = Analyzer::new(config(settings(3, true)));
    let mut extractor = CardTextExtractor::new(SelectorConfig::default());
    let mut view = acme_view();

    let result = analyzer.analyze(&mut view, &mut extractor).await.unwrap();

    assert_eq!(result.company_id, "acme");
    assert_eq!(result.company_name, "Acme Corp");
    assert_eq!(
        result.timestamp,
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap().timestamp_millis()
    );

    let months: Vec<u32> = result.records.iter().map(|r| r.tenure_months).collect();
    assert_eq!(months, vec![53, 24, 11, 107, 99]);
    let past: Vec<bool> = result.records.iter().map(|r| r.raw.is_past).collect();
    assert_eq!(past, vec![false, false, false, true, true]);
    let confidence: Vec<Confidence> = result.records.iter().map(|r| r.confidence).collect();
    assert_eq!(
        confidence,
        vec![
            Confidence::High,
            Confidence::High,
            Confidence::High,
            Confidence::Medium,
            Confidence::Medium
        ]
    );

    let stats = &result.stats;
    assert_eq!((stats.count, stats.current_count, stats.past_count), (5, 3, 2));
    assert_eq!(stats.mean, 58.8);
    assert_eq!((stats.median, stats.min, stats.max), (53, 11, 107));
    assert_eq!(stats.histogram.total(), 5);
    assert_eq!(
        stats.data_quality,
        DataQuality {
            missing_start_date: 0,
            missing_end_date: 2,
            ambiguous_dates: 0,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn past_roster_skipped_when_disabled() {
    let mut analyzer = Analyzer::new(config(settings(3, false)));
    let mut extractor = CardTextExtractor::new(SelectorConfig::default());
    let mut view = acme_view();

    let result = analyzer.analyze(&mut view, &mut extractor).await.unwrap();

    assert_eq!(result.stats.past_count, 0);
    assert_eq!(view.activations(), 0);
}

#[tokio::test(start_paused = true)]
async fn progress_events_bracket_the_run() {
    let (tx, rx) = mpsc::channel();
    let mut analyzer =
        Analyzer::new(config(settings(3, true))).with_sink(Box::new(ChannelProgressSink::new(tx)));
    let mut extractor = CardTextExtractor::new(SelectorConfig::default());

    analyzer.analyze(&mut acme_view(), &mut extractor).await.unwrap();
    let events: Vec<AnalysisEvent> = rx.try_iter().collect();

    assert_eq!(
        events.first(),
        Some(&AnalysisEvent::Started {
            company_id: "acme".into(),
            target: 3
        })
    );
    assert_eq!(events.last(), Some(&AnalysisEvent::Completed { records: 5 }));
    let rosters: Vec<Roster> = events
        .iter()
        .filter_map(|e| match e {
            AnalysisEvent::CrawlFinished { roster, .. } => Some(*roster),
            _ => None,
        })
        .collect();
    assert_eq!(rosters, vec![Roster::Current, Roster::Past]);
}

#[tokio::test(start_paused = true)]
async fn nothing_extracted_is_an_error() {
    let mut analyzer = Analyzer::new(config(settings(5, false)));
    let mut extractor = CardTextExtractor::new(SelectorConfig::default());
    let mut view = SnapshotView::new([roster(&[card("ada", "Engineer", "Recently")], "")]);

    let err = analyzer.analyze(&mut view, &mut extractor).await.unwrap_err();
    assert_eq!(
        err,
        AnalysisError::NoUsableData {
            stage: EmptyStage::Extraction
        }
    );
}

#[tokio::test(start_paused = true)]
async fn nothing_surviving_validation_is_an_error() {
    let mut analyzer = Analyzer::new(config(settings(5, false)));
    let mut extractor = CardTextExtractor::new(SelectorConfig::default());
    let mut view = SnapshotView::new([roster(&[card("ada", "Engineer", "Jan 2030")], "")]);

    let err = analyzer.analyze(&mut view, &mut extractor).await.unwrap_err();
    assert_eq!(
        err,
        AnalysisError::NoUsableData {
            stage: EmptyStage::Normalization
        }
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_company_without_location_or_heading() {
    let mut analyzer = Analyzer::new(config(settings(5, false)));
    let mut extractor = CardTextExtractor::new(SelectorConfig::default());
    let mut view = SnapshotView::new([format!("<ul>{}</ul>", card("ada", "Engineer", "Jan 2020"))]);

    let result = analyzer.analyze(&mut view, &mut extractor).await.unwrap();
    assert_eq!(result.company_id, "unknown");
    assert_eq!(result.company_name, "Unknown Company");
}

#[tokio::test(start_paused = true)]
async fn profile_fetch_mode_runs_through_analyzer() {
    let mut profiles = SnapshotProfileViewer::new();
    profiles.insert("ada", "<main>Engineer · Apr 2018 - Present</main>");
    let settings = Settings {
        extraction_mode: ExtractionMode::ProfileFetch,
        ..settings(5, false)
    };
    let mut analyzer = Analyzer::new(config(settings));
    let mut extractor = Extraction::for_mode(
        settings.extraction_mode,
        SelectorConfig::default(),
        profiles,
        ProfileFetchSettings::default(),
        2024,
    );
    let mut view = SnapshotView::new([roster(&[card("ada", "Engineer", "2023")], "")]);

    let result = analyzer.analyze(&mut view, &mut extractor).await.unwrap();

    assert_eq!(result.records[0].raw.start_date_text, "Apr 2018");
    assert_eq!(result.records[0].tenure_months, 74);
}
