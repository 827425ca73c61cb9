use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Videos at or under this many seconds are Shorts.
pub const DEFAULT_SHORT_THRESHOLD_SECS: u64 = 180;

/// Denominator floor for benchmark gaps on count metrics.
pub const DEFAULT_BENCHMARK_FLOOR: f64 = 1.0;

/// Every threshold the analyzers use, with documented defaults.
///
/// Nothing in `ytci-engine` embeds these as literals; each analyzer reads the
/// field it needs from here or takes it as an explicit argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound (inclusive) for a Short. Default `180`.
    pub duration_threshold_secs: u64,
    /// Fewest matching videos a per-pattern aggregate is reported for. Default `2`.
    pub min_sample_size: usize,
    /// Fewest videos the title analyzer accepts. Default `10`.
    pub title_min_videos: usize,
    /// Share of the population that makes up the top subset. Default `0.2`.
    pub title_top_fraction: f64,
    /// Floor on the size of the top subset. Default `3`.
    pub title_top_min: usize,
    /// Number of top videos passed through for display. Default `10`.
    pub title_top_videos_shown: usize,
    /// Number of recurring top-title keywords reported. Default `10`.
    pub title_keyword_limit: usize,
    /// Fewest dated videos the schedule analyzer accepts. Default `5`.
    pub schedule_min_videos: usize,
    /// Fewest ISO weeks needed for the frequency/views correlation. Default `4`.
    pub schedule_min_weeks: usize,
    /// IANA zone used for day and hour bucketing. Default `UTC`.
    pub timezone: String,
    /// Views-to-baseline ratio that counts as an outlier. Default `2.5`.
    pub outlier_min_multiplier: f64,
    /// Only videos published within this many days are flagged. Default `90`.
    pub outlier_window_days: i64,
    /// Fewest videos a channel needs before a baseline is trusted. Default `2`.
    pub outlier_min_videos: usize,
    /// Distinct competitors that must use a pattern for it to be a gap. Default `2`.
    pub gap_min_competitors: usize,
    /// Example competitor videos attached to each gap. Default `2`.
    pub gap_examples: usize,
    /// Denominator floor for count-metric benchmark gaps. Default `1.0`.
    pub benchmark_floor: f64,
    pub log_level: String,
    /// Optional YAML file overriding the built-in rule sets.
    pub rules_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            duration_threshold_secs: DEFAULT_SHORT_THRESHOLD_SECS,
            min_sample_size: 2,
            title_min_videos: 10,
            title_top_fraction: 0.2,
            title_top_min: 3,
            title_top_videos_shown: 10,
            title_keyword_limit: 10,
            schedule_min_videos: 5,
            schedule_min_weeks: 4,
            timezone: "UTC".to_string(),
            outlier_min_multiplier: 2.5,
            outlier_window_days: 90,
            outlier_min_videos: 2,
            gap_min_competitors: 2,
            gap_examples: 2,
            benchmark_floor: DEFAULT_BENCHMARK_FLOOR,
            log_level: "info".to_string(),
            rules_path: None,
        }
    }
}
