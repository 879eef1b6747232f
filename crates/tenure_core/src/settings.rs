use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a card's start date is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtractionMode {
    /// Read the caption on the card itself. Fast, coarse.
    #[default]
    CardOnly,
    /// Open each member's profile in a sub-view and scan its date ranges. Slow, precise.
    ProfileFetch,
}

/// User-facing analysis settings, owned by the settings collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_records: usize,
    pub include_past_records: bool,
    pub extraction_mode: ExtractionMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_records: 50,
            include_past_records: true,
            extraction_mode: ExtractionMode::CardOnly,
        }
    }
}

/// Sliding-window limits for card-level extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_calls: usize,
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_calls: 20,
            window: Duration::from_secs(60),
        }
    }
}

/// Pacing for the profile-fetch extraction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileFetchSettings {
    /// Minimum spacing between two profile opens.
    pub cooldown: Duration,
    pub render_timeout: Duration,
    pub poll_interval: Duration,
    pub min_plausible_year: i32,
}

impl Default for ProfileFetchSettings {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(8),
            render_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            min_plausible_year: 1950,
        }
    }
}
