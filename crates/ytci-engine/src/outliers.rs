//! Videos that beat their channel's mean views by a configurable multiple.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use ytci_core::{ChannelSnapshot, VideoRecord};

/// A baseline needs at least this many videos.
pub const MIN_BASELINE_VIDEOS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierVideo {
    pub video_id: String,
    pub title: String,
    pub views: u64,
    pub baseline_views: f64,
    pub multiplier: f64,
    pub published_at: DateTime<Utc>,
    pub days_since_publish: i64,
    /// Set by [`detect_channel_outliers`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Flag videos with `views / baseline >= min_multiplier` published within
/// `window_days` before `as_of`.
///
/// The baseline is the mean views over every video with valid counts, dated
/// or not. Fewer than [`MIN_BASELINE_VIDEOS`] such videos, or a zero
/// baseline, yields no outliers. Results are sorted by multiplier descending.
#[must_use]
pub fn detect_outliers(
    videos: &[VideoRecord],
    min_multiplier: f64,
    window_days: i64,
    as_of: DateTime<Utc>,
) -> Vec<OutlierVideo> {
    detect_outliers_with_min_baseline(
        videos,
        min_multiplier,
        window_days,
        MIN_BASELINE_VIDEOS,
        as_of,
    )
}

/// [`detect_outliers`] with a configurable baseline size. Values below
/// [`MIN_BASELINE_VIDEOS`] are raised to it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_outliers_with_min_baseline(
    videos: &[VideoRecord],
    min_multiplier: f64,
    window_days: i64,
    min_baseline_videos: usize,
    as_of: DateTime<Utc>,
) -> Vec<OutlierVideo> {
    let counted: Vec<&VideoRecord> = videos.iter().filter(|v| v.counts_valid).collect();
    if counted.len() < min_baseline_videos.max(MIN_BASELINE_VIDEOS) {
        tracing::debug!(
            available = counted.len(),
            "too few videos to establish an outlier baseline"
        );
        return Vec::new();
    }

    let baseline = counted.iter().map(|v| v.views as f64).sum::<f64>() / counted.len() as f64;
    if baseline <= 0.0 {
        return Vec::new();
    }

    let window = TimeDelta::try_days(window_days).unwrap_or(TimeDelta::MAX);
    let mut outliers: Vec<OutlierVideo> = counted
        .iter()
        .filter_map(|video| {
            let published_at = video.published_at?;
            let age = as_of - published_at;
            if age < TimeDelta::zero() || age > window {
                return None;
            }
            let multiplier = video.views as f64 / baseline;
            (multiplier >= min_multiplier).then(|| OutlierVideo {
                video_id: video.id.clone(),
                title: video.title.clone(),
                views: video.views,
                baseline_views: baseline,
                multiplier,
                published_at,
                days_since_publish: age.num_days(),
                channel: None,
            })
        })
        .collect();

    outliers.sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
    outliers
}

/// [`detect_outliers_with_min_baseline`] per channel, each against its own
/// baseline, merged and tagged with the channel name.
#[must_use]
pub fn detect_channel_outliers(
    channels: &[ChannelSnapshot],
    min_multiplier: f64,
    window_days: i64,
    min_baseline_videos: usize,
    as_of: DateTime<Utc>,
) -> Vec<OutlierVideo> {
    let mut merged: Vec<OutlierVideo> = channels
        .iter()
        .flat_map(|channel| {
            detect_outliers_with_min_baseline(
                &channel.videos,
                min_multiplier,
                window_days,
                min_baseline_videos,
                as_of,
            )
            .into_iter()
            .map(move |mut outlier| {
                outlier.channel = Some(channel.name.clone());
                outlier
            })
        })
        .collect();
    merged.sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
    merged
}
