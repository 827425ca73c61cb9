//! Upload schedule analysis in a caller-chosen timezone.
//!
//! Publish instants are stored in UTC. Each one is converted with the zone
//! rules in force at that instant (DST aware) before it is bucketed by
//! weekday, 6-hour block, hour, and ISO week.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use ytci_core::{AnalysisConfig, VideoRecord};

use crate::analysis::Analysis;
use crate::error::EngineError;
use crate::stats::{mean, pearson, std_dev};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fixed 6-hour blocks of the local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeBlock {
    /// 00:00–05:59
    Night,
    /// 06:00–11:59
    Morning,
    /// 12:00–17:59
    Afternoon,
    /// 18:00–23:59
    Evening,
}

impl TimeBlock {
    pub const ALL: [TimeBlock; 4] = [
        TimeBlock::Night,
        TimeBlock::Morning,
        TimeBlock::Afternoon,
        TimeBlock::Evening,
    ];

    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeBlock::Night,
            6..=11 => TimeBlock::Morning,
            12..=17 => TimeBlock::Afternoon,
            _ => TimeBlock::Evening,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            TimeBlock::Night => 0,
            TimeBlock::Morning => 1,
            TimeBlock::Afternoon => 2,
            TimeBlock::Evening => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TimeBlock::Night => "Night (00-06)",
            TimeBlock::Morning => "Morning (06-12)",
            TimeBlock::Afternoon => "Afternoon (12-18)",
            TimeBlock::Evening => "Evening (18-24)",
        }
    }
}

/// Views aggregate for one weekday, time block, or hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleBucket {
    pub index: usize,
    pub label: String,
    pub video_count: usize,
    pub total_views: u64,
    /// `0.0` for empty buckets.
    pub mean_views: f64,
}

impl ScheduleBucket {
    fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            video_count: 0,
            total_views: 0,
            mean_views: 0.0,
        }
    }

    fn add(&mut self, views: u64) {
        self.video_count += 1;
        self.total_views = self.total_views.saturating_add(views);
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&mut self) {
        if self.video_count > 0 {
            self.mean_views = self.total_views as f64 / self.video_count as f64;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleProfile {
    pub timezone: String,
    pub sample_size: usize,
    pub records_skipped: usize,
    /// Sunday (0) through Saturday (6).
    pub days: Vec<ScheduleBucket>,
    /// Night, Morning, Afternoon, Evening.
    pub time_blocks: Vec<ScheduleBucket>,
    /// Local hours 0..=23.
    pub hourly: Vec<ScheduleBucket>,
    pub best_day: Option<String>,
    pub best_time_block: Option<String>,
    /// `[0, 100]`; higher means more regular gaps between uploads.
    pub cadence_consistency_score: f64,
    pub mean_interval_days: f64,
    /// Pearson r between weekly upload count and weekly mean views, `[-1, 1]`.
    pub frequency_views_correlation: f64,
    pub weeks_observed: usize,
    pub uploads_per_week: f64,
}

/// Parse an IANA timezone identifier.
///
/// # Errors
///
/// Returns [`EngineError::UnknownTimezone`] when the identifier is not in the
/// tz database.
pub fn parse_timezone(timezone: &str) -> Result<Tz, EngineError> {
    timezone
        .trim()
        .parse::<Tz>()
        .map_err(|_| EngineError::UnknownTimezone(timezone.to_string()))
}

/// Convert a UTC instant to local time using the offset in force at that instant.
#[must_use]
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// Bucket dated videos by local weekday, time block and hour, and measure
/// upload cadence and the frequency/performance relationship.
///
/// Only [`VideoRecord::is_usable`] records take part. Fewer than
/// `schedule_min_videos` of them yields [`Analysis::InsufficientData`].
/// The frequency/views correlation is `0.0` unless at least
/// `schedule_min_weeks` ISO weeks contain uploads.
///
/// # Errors
///
/// Returns [`EngineError::UnknownTimezone`] for an unrecognised `timezone`.
#[allow(clippy::cast_precision_loss)]
pub fn analyze_upload_schedule(
    videos: &[VideoRecord],
    timezone: &str,
    config: &AnalysisConfig,
) -> Result<Analysis<ScheduleProfile>, EngineError> {
    let tz = parse_timezone(timezone)?;

    let mut dated: Vec<(DateTime<Utc>, u64)> = videos
        .iter()
        .filter(|v| v.is_usable())
        .filter_map(|v| Some((v.published_at?, v.views)))
        .collect();
    let records_skipped = videos.len() - dated.len();

    if dated.len() < config.schedule_min_videos {
        tracing::debug!(
            available = dated.len(),
            required = config.schedule_min_videos,
            skipped = records_skipped,
            "not enough dated videos for schedule analysis"
        );
        return Ok(Analysis::InsufficientData {
            required: config.schedule_min_videos,
            available: dated.len(),
        });
    }

    dated.sort_by_key(|(instant, _)| *instant);

    let mut days: Vec<ScheduleBucket> = DAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| ScheduleBucket::new(i, *name))
        .collect();
    let mut time_blocks: Vec<ScheduleBucket> = TimeBlock::ALL
        .iter()
        .map(|b| ScheduleBucket::new(b.index(), b.label()))
        .collect();
    let mut hourly: Vec<ScheduleBucket> = (0..24)
        .map(|h| ScheduleBucket::new(h, format!("{h:02}:00")))
        .collect();
    let mut weeks: BTreeMap<(i32, u32), (usize, u64)> = BTreeMap::new();
    let mut local_dates: Vec<NaiveDate> = Vec::with_capacity(dated.len());

    for (instant, views) in &dated {
        let local = to_local(*instant, tz);
        let hour = local.hour();
        local_dates.push(local.date_naive());

        days[local.weekday().num_days_from_sunday() as usize].add(*views);
        time_blocks[TimeBlock::from_hour(hour).index()].add(*views);
        hourly[hour as usize].add(*views);

        let iso = local.iso_week();
        let week = weeks.entry((iso.year(), iso.week())).or_insert((0, 0));
        week.0 += 1;
        week.1 = week.1.saturating_add(*views);
    }

    for bucket in days.iter_mut().chain(&mut time_blocks).chain(&mut hourly) {
        bucket.finish();
    }

    let instants: Vec<DateTime<Utc>> = dated.iter().map(|(instant, _)| *instant).collect();
    let intervals = interval_days(&local_dates);
    let mean_interval_days = mean(&intervals);

    let weekly: Vec<(usize, u64)> = weeks.values().copied().collect();
    let frequency_views_correlation = if weekly.len() >= config.schedule_min_weeks {
        let counts: Vec<f64> = weekly.iter().map(|(count, _)| *count as f64).collect();
        let means: Vec<f64> = weekly
            .iter()
            .map(|(count, views)| *views as f64 / *count as f64)
            .collect();
        pearson(&counts, &means)
    } else {
        0.0
    };

    Ok(Analysis::Ready(ScheduleProfile {
        timezone: tz.name().to_string(),
        sample_size: dated.len(),
        records_skipped,
        best_day: best_bucket(&days),
        best_time_block: best_bucket(&time_blocks),
        days,
        time_blocks,
        hourly,
        cadence_consistency_score: cadence_consistency(&intervals),
        mean_interval_days,
        frequency_views_correlation,
        weeks_observed: weekly.len(),
        uploads_per_week: uploads_per_week(&instants),
    }))
}

/// Whole local calendar days between consecutive (sorted) publish dates.
/// Uploads on the same local day are `0` apart.
#[allow(clippy::cast_precision_loss)]
fn interval_days(sorted: &[NaiveDate]) -> Vec<f64> {
    sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect()
}

/// `n / max(1, span_weeks)` over ascending publish instants.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn uploads_per_week(sorted: &[DateTime<Utc>]) -> f64 {
    let span_days = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (*last - *first).num_seconds() as f64 / SECONDS_PER_DAY,
        _ => return 0.0,
    };
    sorted.len() as f64 / (span_days / 7.0).max(1.0)
}

/// `clamp(0, 100, 100 - stdDev / mean * 100)` over upload intervals.
///
/// No intervals, or a mean interval of zero (a single video, or every upload
/// on the same local day), scores `0.0`.
#[must_use]
pub fn cadence_consistency(intervals: &[f64]) -> f64 {
    let m = mean(intervals);
    if intervals.is_empty() || m <= 0.0 {
        return 0.0;
    }
    (100.0 - std_dev(intervals) / m * 100.0).clamp(0.0, 100.0)
}

/// Label of the non-empty bucket with the highest mean; ties go to the
/// lowest index.
fn best_bucket(buckets: &[ScheduleBucket]) -> Option<String> {
    let mut best: Option<&ScheduleBucket> = None;
    for bucket in buckets.iter().filter(|b| b.video_count > 0) {
        if best.map_or(true, |current| bucket.mean_views > current.mean_views) {
            best = Some(bucket);
        }
    }
    best.map(|b| b.label.clone())
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
