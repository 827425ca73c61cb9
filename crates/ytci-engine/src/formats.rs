//! Format breakdown: content type (first matching rule) and duration class.

use serde::Serialize;
use ytci_core::{PatternRule, VideoRecord, VideoType, OTHER_LABEL};

use crate::classify::classify_first;
use crate::stats::percent_of;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatBucket {
    pub name: String,
    pub count: usize,
    /// Share of all videos, `0..=100`.
    pub percentage: f64,
    pub total_views: u64,
    pub mean_views: f64,
    /// `Σ(likes + comments) / Σviews` over the bucket.
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatAnalysis {
    pub total_videos: usize,
    /// Bucketed records whose counts were zeroed during normalization.
    pub invalid_counts: usize,
    /// Rule order, `Other` last.
    pub content_types: Vec<FormatBucket>,
    /// Shorts, then Long-form.
    pub durations: Vec<FormatBucket>,
}

#[derive(Default)]
struct Tally {
    count: usize,
    views: u64,
    interactions: u64,
}

impl Tally {
    fn add(&mut self, video: &VideoRecord) {
        self.count += 1;
        self.views = self.views.saturating_add(video.views);
        self.interactions = self
            .interactions
            .saturating_add(video.likes.saturating_add(video.comments));
    }

    #[allow(clippy::cast_precision_loss)]
    fn into_bucket(self, name: &str, total: usize) -> FormatBucket {
        FormatBucket {
            name: name.to_string(),
            count: self.count,
            percentage: percent_of(self.count, total),
            total_views: self.views,
            mean_views: self.views as f64 / self.count as f64,
            engagement_rate: if self.views == 0 {
                0.0
            } else {
                self.interactions as f64 / self.views as f64
            },
        }
    }
}

/// Place every video in exactly one content-type bucket and exactly one
/// duration bucket.
///
/// Records with invalid counts are bucketed too; their counts are already
/// zero, so they add to `count` but not to views or engagement.
///
/// `duration_threshold_secs` reclassifies Short/Long at call time, so a
/// different threshold than the one used during normalization is honoured.
#[must_use]
pub fn categorize_formats(
    videos: &[VideoRecord],
    type_rules: &[PatternRule],
    duration_threshold_secs: u64,
) -> FormatAnalysis {
    let total = videos.len();

    // One slot per rule plus a trailing slot for `Other`.
    let mut by_type: Vec<Tally> = std::iter::repeat_with(Tally::default)
        .take(type_rules.len() + 1)
        .collect();
    let mut shorts = Tally::default();
    let mut long_form = Tally::default();

    for video in videos {
        let label = classify_first(&video.title, type_rules);
        let slot = type_rules
            .iter()
            .position(|rule| rule.name() == label)
            .unwrap_or(type_rules.len());
        by_type[slot].add(video);

        match VideoType::from_duration(video.duration_seconds, duration_threshold_secs) {
            VideoType::Short => shorts.add(video),
            VideoType::Long => long_form.add(video),
        }
    }

    let names = type_rules.iter().map(PatternRule::name).chain([OTHER_LABEL]);
    let content_types = by_type
        .into_iter()
        .zip(names)
        .filter(|(tally, _)| tally.count > 0)
        .map(|(tally, name)| tally.into_bucket(name, total))
        .collect();

    let durations = [(shorts, VideoType::Short), (long_form, VideoType::Long)]
        .into_iter()
        .filter(|(tally, _)| tally.count > 0)
        .map(|(tally, kind)| tally.into_bucket(kind.label(), total))
        .collect();

    FormatAnalysis {
        total_videos: total,
        invalid_counts: videos.iter().filter(|v| !v.counts_valid).count(),
        content_types,
        durations,
    }
}
