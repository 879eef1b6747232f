use std::path::PathBuf;

use clap::Parser;
use tenure_core::{ExtractionMode, Settings};

#[derive(Debug, Parser)]
#[command(name = "tenure")]
#[command(about = "Estimates member tenure statistics from recorded roster pages")]
pub struct Cli {
    /// Roster snapshots (HTML), in the order "next"/"show more" reveals them.
    /// Without any, the last stored analysis is printed.
    pub snapshots: Vec<PathBuf>,

    /// Address the roster was recorded from, e.g. https://host/company/acme/people/
    #[arg(long)]
    pub location: Option<String>,

    /// RON file overriding the default selector configuration.
    #[arg(long)]
    pub selectors: Option<PathBuf>,

    /// Directory of recorded profile pages, one `<slug>.html` per member.
    #[arg(long)]
    pub profiles: Option<PathBuf>,

    /// Where settings, cache and the last analysis are kept.
    #[arg(long, default_value = "tenure-data")]
    pub store: PathBuf,

    /// Write CSV and JSON exports into this directory.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub max_records: Option<usize>,

    /// Skip the former-members roster.
    #[arg(long)]
    pub no_past: bool,

    /// Open each member profile instead of reading card captions.
    #[arg(long)]
    pub profile_fetch: bool,

    /// Persist the effective settings for later runs.
    #[arg(long)]
    pub save_settings: bool,

    /// Ignore cached records and analyze again.
    #[arg(long)]
    pub refresh: bool,

    #[arg(long)]
    pub clear_cache: bool,

    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Stored settings with command-line overrides applied.
    pub fn apply_overrides(&self, stored: Settings) -> Settings {
        let mut settings = stored;
        if let Some(max) = self.max_records {
            settings.max_records = max;
        }
        if self.no_past {
            settings.include_past_records = false;
        }
        if self.profile_fetch {
            settings.extraction_mode = ExtractionMode::ProfileFetch;
        }
        settings
    }
}
