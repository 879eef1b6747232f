use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tenure_core::SelectorConfig;
use tenure_engine::SnapshotProfileViewer;
use tenure_logging::{tenure_info, tenure_warn};

/// Selector overrides from a RON file; fields left out keep their defaults.
pub fn load_selectors(path: Option<&Path>) -> Result<SelectorConfig> {
    let Some(path) = path else {
        return Ok(SelectorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading selectors from {}", path.display()))?;
    let selectors =
        ron::from_str(&text).with_context(|| format!("parsing selectors in {}", path.display()))?;
    tenure_info!("Loaded selector overrides from {}", path.display());
    Ok(selectors)
}

pub fn load_snapshots(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("reading snapshot {}", path.display()))
        })
        .collect()
}

/// Every `*.html` file in `dir`, keyed by file stem.
pub fn load_profiles(dir: Option<&Path>) -> Result<SnapshotProfileViewer> {
    let mut viewer = SnapshotProfileViewer::new();
    let Some(dir) = dir else {
        return Ok(viewer);
    };
    let entries =
        fs::read_dir(dir).with_context(|| format!("listing profiles in {}", dir.display()))?;
    let mut loaded = 0;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|stem| stem.to_str()) else {
            tenure_warn!("Skipping profile with non-UTF-8 name: {}", path.display());
            continue;
        };
        let html = fs::read_to_string(&path)
            .with_context(|| format!("reading profile {}", path.display()))?;
        viewer.insert(slug, html);
        loaded += 1;
    }
    tenure_info!("Loaded {} recorded profiles from {}", loaded, dir.display());
    Ok(viewer)
}
