use std::path::{Path, PathBuf};

use tenure_core::NormalizedRecord;
use tenure_logging::tenure_info;

use crate::analyze::AnalysisResult;
use crate::filename::export_stem;
use crate::persist::{write_atomic, PersistError};

const CSV_HEADERS: [&str; 8] = [
    "Name",
    "Title",
    "Start Date",
    "End Date",
    "Tenure (months)",
    "Tenure (years)",
    "Status",
    "Profile URL",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub record_count: usize,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One header row plus one row per record; every cell quoted.
pub fn records_to_csv(records: &[NormalizedRecord]) -> String {
    let mut out = csv_row(CSV_HEADERS.iter().map(|h| h.to_string()));
    for record in records {
        let raw = &record.raw;
        out.push_str(&csv_row([
            raw.name.clone().unwrap_or_default(),
            raw.title.clone(),
            raw.start_date_text.clone(),
            raw.end_date_text.clone().unwrap_or_default(),
            record.tenure_months.to_string(),
            record.tenure_years.to_string(),
            if raw.is_past { "Past" } else { "Current" }.to_string(),
            raw.profile_ref.clone(),
        ]));
    }
    out
}

fn csv_row(cells: impl IntoIterator<Item = String>) -> String {
    let mut row = cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

pub fn analysis_to_json(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Writes `<stem>.csv` and `<stem>.json` for `result` into `dir`.
pub fn write_exports(dir: &Path, result: &AnalysisResult) -> Result<ExportSummary, ExportError> {
    let stem = export_stem(&result.company_name, &result.company_id);
    let csv_path = write_atomic(
        dir,
        &format!("{stem}.csv"),
        records_to_csv(&result.records).as_bytes(),
    )?;
    let json_path = write_atomic(
        dir,
        &format!("{stem}.json"),
        analysis_to_json(result)?.as_bytes(),
    )?;
    tenure_info!(
        "Exported {} records to {} and {}",
        result.records.len(),
        csv_path.display(),
        json_path.display()
    );
    Ok(ExportSummary {
        record_count: result.records.len(),
        csv_path,
        json_path,
    })
}
