//! Result envelopes shared by the analyzers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ytci_core::VideoRecord;

use crate::stats::weighted_mean;

/// Outcome of an analyzer with a minimum sample size.
///
/// "Not enough data yet" is the normal state for a new channel, so it is a
/// variant rather than an error.
///
/// Serialized internally tagged: `Ready` flattens its payload next to
/// `"status": "ready"`, so `T` must serialize as a struct or map. Scalar
/// payloads fail at serialization time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis<T> {
    Ready(T),
    InsufficientData { required: usize, available: usize },
}

impl<T> Analysis<T> {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Analysis::Ready(_))
    }

    /// The result, if the analyzer had enough data.
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Analysis::Ready(value) => Some(value),
            Analysis::InsufficientData { .. } => None,
        }
    }

    #[must_use]
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Analysis::Ready(value) => Some(value),
            Analysis::InsufficientData { .. } => None,
        }
    }
}

/// Minimal view of a video for display lists and examples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<&VideoRecord> for VideoSummary {
    fn from(video: &VideoRecord) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            views: video.views,
            published_at: video.published_at,
        }
    }
}

/// Aggregate over the videos matching one rule or category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternStats {
    pub count: usize,
    pub total_views: u64,
    pub mean_views: f64,
    /// Impression-weighted CTR; `None` when no matching video reports impressions.
    pub weighted_ctr: Option<f64>,
    /// View-weighted retention; `None` when no matching video reports it.
    pub weighted_retention: Option<f64>,
    /// IDs of the most-viewed matching videos.
    pub example_video_ids: Vec<String>,
}

impl PatternStats {
    /// Aggregates `videos`, keeping up to `max_examples` example IDs.
    ///
    /// Returns `None` when fewer than `min_sample_size` videos matched.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_videos(
        videos: &[&VideoRecord],
        min_sample_size: usize,
        max_examples: usize,
    ) -> Option<Self> {
        if videos.is_empty() || videos.len() < min_sample_size {
            return None;
        }

        let total_views = videos
            .iter()
            .fold(0_u64, |total, v| total.saturating_add(v.views));
        let weighted_ctr = weighted_mean(
            videos
                .iter()
                .filter_map(|v| Some((v.ctr?, v.impressions? as f64))),
        );
        let weighted_retention =
            weighted_mean(videos.iter().filter_map(|v| Some((v.retention?, v.views as f64))));

        let mut ranked: Vec<&&VideoRecord> = videos.iter().collect();
        ranked.sort_by(|a, b| b.views.cmp(&a.views));

        Some(Self {
            count: videos.len(),
            total_views,
            mean_views: total_views as f64 / videos.len() as f64,
            weighted_ctr,
            weighted_retention,
            example_video_ids: ranked
                .into_iter()
                .take(max_examples)
                .map(|v| v.id.clone())
                .collect(),
        })
    }
}
