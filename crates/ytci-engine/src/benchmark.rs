//! Per-metric gaps between a subject channel and the mean of its competitors.
//!
//! Ratio metrics are always aggregated with [`weighted_mean`] (CTR by
//! impressions, retention and engagement by views); a plain mean of
//! per-video ratios would let a 10-view video count as much as a 1M-view one.

use serde::Serialize;
use ytci_core::{AnalysisConfig, ChannelSnapshot, VideoRecord, VideoType, DEFAULT_BENCHMARK_FLOOR};

pub use crate::stats::weighted_mean;
use crate::schedule::uploads_per_week;
use crate::stats::{mean, median};

/// Denominator floor for metrics that live in `[0, 1]`, where a floor of
/// `1.0` would swamp every difference.
pub const RATIO_GAP_FLOOR: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkGap {
    pub subject_value: f64,
    /// `0.0` for an empty competitor set.
    pub competitor_average: f64,
    pub competitor_count: usize,
    /// `(subject - average) / max(average, floor) * 100`.
    pub gap_percent: f64,
}

/// Gap against the competitor mean, flooring the denominator at
/// [`DEFAULT_BENCHMARK_FLOOR`].
#[must_use]
pub fn compute_benchmark_gap(subject: f64, competitors: &[f64]) -> BenchmarkGap {
    compute_benchmark_gap_with_floor(subject, competitors, DEFAULT_BENCHMARK_FLOOR)
}

/// Gap against the competitor mean with an explicit denominator floor.
///
/// Non-finite competitor values are ignored.
#[must_use]
pub fn compute_benchmark_gap_with_floor(
    subject: f64,
    competitors: &[f64],
    floor: f64,
) -> BenchmarkGap {
    let values: Vec<f64> = competitors.iter().copied().filter(|v| v.is_finite()).collect();
    let competitor_average = mean(&values);
    BenchmarkGap {
        subject_value: subject,
        competitor_average,
        competitor_count: values.len(),
        gap_percent: (subject - competitor_average) / competitor_average.max(floor) * 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkMetric {
    AvgViews,
    MedianViews,
    EngagementRate,
    AvgCtr,
    AvgRetention,
    UploadsPerWeek,
    AvgDurationSecs,
    ShortShare,
    SubscriberCount,
}

impl BenchmarkMetric {
    pub const ALL: [BenchmarkMetric; 9] = [
        BenchmarkMetric::AvgViews,
        BenchmarkMetric::MedianViews,
        BenchmarkMetric::EngagementRate,
        BenchmarkMetric::AvgCtr,
        BenchmarkMetric::AvgRetention,
        BenchmarkMetric::UploadsPerWeek,
        BenchmarkMetric::AvgDurationSecs,
        BenchmarkMetric::ShortShare,
        BenchmarkMetric::SubscriberCount,
    ];

    #[must_use]
    pub fn is_ratio(self) -> bool {
        matches!(
            self,
            BenchmarkMetric::EngagementRate
                | BenchmarkMetric::AvgCtr
                | BenchmarkMetric::AvgRetention
                | BenchmarkMetric::ShortShare
        )
    }

    #[must_use]
    pub fn floor(self, config: &AnalysisConfig) -> f64 {
        if self.is_ratio() {
            RATIO_GAP_FLOOR
        } else {
            config.benchmark_floor
        }
    }

    #[must_use]
    pub fn value(self, metrics: &ChannelMetrics) -> Option<f64> {
        match self {
            BenchmarkMetric::AvgViews => metrics.avg_views,
            BenchmarkMetric::MedianViews => metrics.median_views,
            BenchmarkMetric::EngagementRate => metrics.engagement_rate,
            BenchmarkMetric::AvgCtr => metrics.avg_ctr,
            BenchmarkMetric::AvgRetention => metrics.avg_retention,
            BenchmarkMetric::UploadsPerWeek => metrics.uploads_per_week,
            BenchmarkMetric::AvgDurationSecs => metrics.avg_duration_secs,
            BenchmarkMetric::ShortShare => metrics.short_share,
            BenchmarkMetric::SubscriberCount => metrics.subscriber_count,
        }
    }
}

/// Channel-level values fed to the benchmark. `None` means "not measurable
/// from this snapshot", not zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMetrics {
    pub channel: String,
    pub sample_size: usize,
    pub avg_views: Option<f64>,
    pub median_views: Option<f64>,
    pub engagement_rate: Option<f64>,
    pub avg_ctr: Option<f64>,
    pub avg_retention: Option<f64>,
    pub uploads_per_week: Option<f64>,
    pub avg_duration_secs: Option<f64>,
    pub short_share: Option<f64>,
    pub subscriber_count: Option<f64>,
}

impl ChannelMetrics {
    /// Aggregate the snapshot's usable videos.
    ///
    /// Short share reclassifies durations with `duration_threshold_secs`.
    /// A subscriber count of zero is treated as unreported.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_snapshot(channel: &ChannelSnapshot, config: &AnalysisConfig) -> Self {
        let videos: Vec<&VideoRecord> = channel.usable_videos().collect();
        let views: Vec<f64> = videos.iter().map(|v| v.views as f64).collect();
        let any = !videos.is_empty();

        let mut instants: Vec<_> = videos.iter().filter_map(|v| v.published_at).collect();
        instants.sort();

        let durations: Vec<f64> = videos
            .iter()
            .filter(|v| v.duration_seconds > 0)
            .map(|v| v.duration_seconds as f64)
            .collect();
        let shorts = videos
            .iter()
            .filter(|v| {
                VideoType::from_duration(v.duration_seconds, config.duration_threshold_secs)
                    == VideoType::Short
            })
            .count();

        Self {
            channel: channel.name.clone(),
            sample_size: videos.len(),
            avg_views: any.then(|| mean(&views)),
            median_views: any.then(|| median(&views)),
            engagement_rate: weighted_mean(
                videos
                    .iter()
                    .map(|v| (v.engagement_rate(), v.views as f64)),
            ),
            avg_ctr: weighted_mean(
                videos
                    .iter()
                    .filter_map(|v| Some((v.ctr?, v.impressions? as f64))),
            ),
            avg_retention: weighted_mean(
                videos
                    .iter()
                    .filter_map(|v| Some((v.retention?, v.views as f64))),
            ),
            uploads_per_week: any.then(|| uploads_per_week(&instants)),
            avg_duration_secs: (!durations.is_empty()).then(|| mean(&durations)),
            short_share: any.then(|| shorts as f64 / videos.len() as f64),
            subscriber_count: (channel.subscriber_count > 0)
                .then_some(channel.subscriber_count as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGap {
    pub metric: BenchmarkMetric,
    #[serde(flatten)]
    pub gap: BenchmarkGap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelBenchmark {
    pub subject: ChannelMetrics,
    pub competitors: Vec<ChannelMetrics>,
    /// One entry per measurable metric, in [`BenchmarkMetric::ALL`] order.
    pub gaps: Vec<MetricGap>,
}

/// Compare `subject` against every competitor on each [`BenchmarkMetric`].
///
/// A metric is left out when the subject has no value for it or no
/// competitor does.
#[must_use]
pub fn benchmark_channel(
    subject: &ChannelSnapshot,
    competitors: &[ChannelSnapshot],
    config: &AnalysisConfig,
) -> ChannelBenchmark {
    let subject_metrics = ChannelMetrics::from_snapshot(subject, config);
    let competitor_metrics: Vec<ChannelMetrics> = competitors
        .iter()
        .map(|c| ChannelMetrics::from_snapshot(c, config))
        .collect();

    let gaps = BenchmarkMetric::ALL
        .iter()
        .filter_map(|metric| {
            let subject_value = metric.value(&subject_metrics)?;
            let values: Vec<f64> = competitor_metrics
                .iter()
                .filter_map(|m| metric.value(m))
                .collect();
            if values.is_empty() {
                tracing::debug!(?metric, "no competitor reports metric, skipping");
                return None;
            }
            Some(MetricGap {
                metric: *metric,
                gap: compute_benchmark_gap_with_floor(subject_value, &values, metric.floor(config)),
            })
        })
        .collect();

    ChannelBenchmark {
        subject: subject_metrics,
        competitors: competitor_metrics,
        gaps,
    }
}

#[cfg(test)]
#[path = "benchmark_test.rs"]
mod tests;
