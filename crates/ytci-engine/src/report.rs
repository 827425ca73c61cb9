//! One-call competitive report over a subject channel and its competitors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ytci_core::{AnalysisConfig, ChannelSnapshot, RuleBook, VideoRecord};

use crate::analysis::Analysis;
use crate::benchmark::{benchmark_channel, ChannelBenchmark};
use crate::error::EngineError;
use crate::formats::{categorize_formats, FormatAnalysis};
use crate::gaps::{find_content_gaps, ContentGap};
use crate::normalize::count_unusable;
use crate::outliers::{detect_channel_outliers, detect_outliers_with_min_baseline, OutlierVideo};
use crate::schedule::{analyze_upload_schedule, ScheduleProfile};
use crate::titles::{analyze_title_patterns, TitleAnalysis};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCounts {
    pub total: usize,
    /// Undated or negative-count records, left out of time-based analyses.
    pub skipped: usize,
}

impl RecordCounts {
    fn of(videos: &[VideoRecord]) -> Self {
        Self {
            total: videos.len(),
            skipped: count_unusable(videos),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitiveReport {
    pub subject: String,
    pub competitors: Vec<String>,
    pub as_of: DateTime<Utc>,
    pub records: RecordCounts,
    pub titles: Analysis<TitleAnalysis>,
    pub schedule: Analysis<ScheduleProfile>,
    pub formats: FormatAnalysis,
    pub outliers: Vec<OutlierVideo>,
    pub competitor_outliers: Vec<OutlierVideo>,
    pub benchmark: ChannelBenchmark,
    pub content_gaps: Vec<ContentGap>,
}

/// Group competitor videos by channel name. Channels sharing a name are merged.
#[must_use]
pub fn videos_by_channel(channels: &[ChannelSnapshot]) -> BTreeMap<String, Vec<VideoRecord>> {
    let mut grouped: BTreeMap<String, Vec<VideoRecord>> = BTreeMap::new();
    for channel in channels {
        grouped
            .entry(channel.name.clone())
            .or_default()
            .extend(channel.videos.iter().cloned());
    }
    grouped
}

/// Run every analyzer for `subject`, plus competitor outliers, the channel
/// benchmark and content gaps against `competitors`.
///
/// Schedule buckets use `config.timezone`; outlier recency is measured back
/// from `as_of`.
///
/// # Errors
///
/// Returns [`EngineError::UnknownTimezone`] if `config.timezone` is not a
/// valid IANA identifier.
pub fn build_report(
    subject: &ChannelSnapshot,
    competitors: &[ChannelSnapshot],
    rules: &RuleBook,
    config: &AnalysisConfig,
    as_of: DateTime<Utc>,
) -> Result<CompetitiveReport, EngineError> {
    let records = RecordCounts::of(&subject.videos);
    tracing::info!(
        subject = %subject.name,
        competitors = competitors.len(),
        videos = records.total,
        skipped = records.skipped,
        "building competitive report"
    );

    let schedule = analyze_upload_schedule(&subject.videos, &config.timezone, config)?;
    let titles = analyze_title_patterns(
        &subject.videos,
        &rules.title_patterns,
        &rules.stopwords,
        config,
    );
    let formats = categorize_formats(
        &subject.videos,
        &rules.content_types,
        config.duration_threshold_secs,
    );
    let outliers = detect_outliers_with_min_baseline(
        &subject.videos,
        config.outlier_min_multiplier,
        config.outlier_window_days,
        config.outlier_min_videos,
        as_of,
    );
    let competitor_outliers = detect_channel_outliers(
        competitors,
        config.outlier_min_multiplier,
        config.outlier_window_days,
        config.outlier_min_videos,
        as_of,
    );
    let benchmark = benchmark_channel(subject, competitors, config);
    let content_gaps = find_content_gaps(
        &subject.videos,
        &videos_by_channel(competitors),
        &rules.content_gaps,
        config.gap_min_competitors,
        config.gap_examples,
    );

    tracing::info!(
        subject = %subject.name,
        title_patterns = titles.as_ready().map_or(0, |t| t.patterns.len()),
        outliers = outliers.len(),
        gaps = content_gaps.len(),
        "competitive report complete"
    );

    Ok(CompetitiveReport {
        subject: subject.name.clone(),
        competitors: competitors.iter().map(|c| c.name.clone()).collect(),
        as_of,
        records,
        titles,
        schedule,
        formats,
        outliers,
        competitor_outliers,
        benchmark,
        content_gaps,
    })
}
