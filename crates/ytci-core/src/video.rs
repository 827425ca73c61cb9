use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A video as handed over by a collector (API sync, export import, database
/// row), before any coercion.
///
/// Every field is optional and numeric fields are raw JSON values: the YouTube
/// Data API returns counts as strings, Studio exports return CTR as a
/// percentage, and older rows may carry `null` anywhere. Turning this into a
/// [`VideoRecord`] is the normalizer's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVideo {
    pub id: Option<String>,
    pub title: Option<String>,
    /// RFC 3339 instant, `YYYY-MM-DD HH:MM:SS` (read as UTC), or `YYYY-MM-DD`.
    pub published_at: Option<String>,
    /// Seconds as a number or string, ISO-8601 (`PT4M13S`), or clock form (`4:13`).
    pub duration: Option<Value>,
    pub views: Option<Value>,
    pub likes: Option<Value>,
    pub comments: Option<Value>,
    /// Ratio in `[0, 1]` or percentage in `(1, 100]`.
    pub ctr: Option<Value>,
    /// Ratio in `[0, 1]` or percentage in `(1, 100]`.
    pub retention: Option<Value>,
    pub impressions: Option<Value>,
}

/// Raw channel payload: identity, channel counters and its raw videos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawChannel {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub subscriber_count: Option<Value>,
    #[serde(default)]
    pub video_count: Option<Value>,
    #[serde(default)]
    pub total_view_count: Option<Value>,
    #[serde(default)]
    pub videos: Vec<RawVideo>,
}

/// Short-form vs long-form split, driven by a duration threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Short,
    Long,
}

impl VideoType {
    /// Classify a duration against `threshold_secs`.
    ///
    /// A zero duration means the length is unknown, and unknown lengths are
    /// classified as [`VideoType::Long`].
    #[must_use]
    pub fn from_duration(duration_seconds: u64, threshold_secs: u64) -> Self {
        if duration_seconds > 0 && duration_seconds <= threshold_secs {
            VideoType::Short
        } else {
            VideoType::Long
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            VideoType::Short => "Shorts",
            VideoType::Long => "Long-form",
        }
    }
}

impl std::fmt::Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoType::Short => write!(f, "short"),
            VideoType::Long => write!(f, "long"),
        }
    }
}

/// One published video with every field coerced and defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    /// `None` when the source date was missing or unparsable.
    pub published_at: Option<DateTime<Utc>>,
    /// `0` when unknown.
    pub duration_seconds: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    /// Click-through rate as a ratio in `[0, 1]`.
    pub ctr: Option<f64>,
    /// Average percentage viewed, as a ratio in `[0, 1]`.
    pub retention: Option<f64>,
    pub impressions: Option<u64>,
    pub video_type: VideoType,
    /// `false` when a source count was negative and had to be zeroed.
    pub counts_valid: bool,
}

impl VideoRecord {
    /// Whether the record can take part in time-bucketed analyses.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.published_at.is_some() && self.counts_valid
    }

    /// `(likes + comments) / views`, or `0.0` for unwatched videos.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn engagement_rate(&self) -> f64 {
        if self.views == 0 {
            return 0.0;
        }
        self.likes.saturating_add(self.comments) as f64 / self.views as f64
    }

    /// Title length in characters, not bytes.
    #[must_use]
    pub fn title_length(&self) -> usize {
        self.title.chars().count()
    }
}

/// A channel with its full video collection.
///
/// `subscriber_count`, `video_count` and `total_view_count` are the channel's
/// own counters and are carried for display. Per-video aggregates are always
/// computed from `videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub id: String,
    pub name: String,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub total_view_count: u64,
    pub videos: Vec<VideoRecord>,
}

impl ChannelSnapshot {
    /// Videos that pass [`VideoRecord::is_usable`].
    pub fn usable_videos(&self) -> impl Iterator<Item = &VideoRecord> {
        self.videos.iter().filter(|v| v.is_usable())
    }
}
