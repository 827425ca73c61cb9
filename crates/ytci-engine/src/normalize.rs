//! Normalization from [`RawVideo`] to [`VideoRecord`].
//!
//! Every numeric coercion in the engine happens here. Downstream analyzers
//! assume fully typed, defaulted fields and never re-check raw values.
//!
//! Normalization never fails: missing or garbage fields become `0` / `None`.
//! Negative counts are zeroed but flag the record through
//! [`VideoRecord::counts_valid`], and unparsable dates leave
//! `published_at` empty, so [`VideoRecord::is_usable`] keeps both out of
//! time- and count-based analyses.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use ytci_core::{ChannelSnapshot, RawChannel, RawVideo, VideoRecord, VideoType};

/// Normalizes a raw video, classifying it short/long against `duration_threshold_secs`.
#[must_use]
pub fn normalize(raw: &RawVideo, duration_threshold_secs: u64) -> VideoRecord {
    let counts_valid = [&raw.views, &raw.likes, &raw.comments, &raw.impressions]
        .into_iter()
        .all(|v| coerce_number(v.as_ref()).map_or(true, |n| n >= 0.0));

    let duration_seconds = parse_duration_value(raw.duration.as_ref());

    VideoRecord {
        id: raw.id.clone().unwrap_or_default(),
        title: raw.title.as_deref().map(str::trim).unwrap_or_default().to_string(),
        published_at: raw.published_at.as_deref().and_then(parse_published_at),
        duration_seconds,
        views: coerce_count(raw.views.as_ref()),
        likes: coerce_count(raw.likes.as_ref()),
        comments: coerce_count(raw.comments.as_ref()),
        ctr: coerce_ratio(raw.ctr.as_ref()),
        retention: coerce_ratio(raw.retention.as_ref()),
        // Absent impressions stay absent so CTR weighting can tell them apart from zero.
        impressions: coerce_number(raw.impressions.as_ref())
            .map(|_| coerce_count(raw.impressions.as_ref())),
        video_type: VideoType::from_duration(duration_seconds, duration_threshold_secs),
        counts_valid,
    }
}

/// Normalizes a batch, logging how many records will be skipped by
/// time-bucketed analyses.
#[must_use]
pub fn normalize_all(raws: &[RawVideo], duration_threshold_secs: u64) -> Vec<VideoRecord> {
    let videos: Vec<VideoRecord> = raws
        .iter()
        .map(|raw| normalize(raw, duration_threshold_secs))
        .collect();

    let unusable = count_unusable(&videos);
    if unusable > 0 {
        tracing::debug!(
            total = videos.len(),
            unusable,
            "normalized batch contains records without a usable date or with negative counts"
        );
    }
    videos
}

/// Normalizes a raw channel and all of its videos.
#[must_use]
pub fn normalize_channel(raw: &RawChannel, duration_threshold_secs: u64) -> ChannelSnapshot {
    let name = raw.name.trim().to_string();
    ChannelSnapshot {
        id: raw
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| name.clone()),
        name,
        subscriber_count: coerce_count(raw.subscriber_count.as_ref()),
        video_count: coerce_count(raw.video_count.as_ref()),
        total_view_count: coerce_count(raw.total_view_count.as_ref()),
        videos: normalize_all(&raw.videos, duration_threshold_secs),
    }
}

/// Number of records failing [`VideoRecord::is_usable`].
#[must_use]
pub fn count_unusable(videos: &[VideoRecord]) -> usize {
    videos.iter().filter(|v| !v.is_usable()).count()
}

/// Reads a JSON number or numeric string (`"1,234"` allowed) as `f64`.
///
/// Returns `None` for missing, non-numeric, or non-finite values.
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Largest count kept after coercion (2^53, the top of `f64`'s exact integers).
pub const MAX_COUNT: u64 = 1 << 53;

/// Coerces a count to a non-negative integer capped at [`MAX_COUNT`];
/// negatives and garbage become `0`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match coerce_number(value) {
        Some(n) if n > 0.0 => n.round().min(MAX_COUNT as f64) as u64,
        _ => 0,
    }
}

/// Coerces a rate to a ratio in `[0, 1]`.
///
/// Values in `(1, 100]` and strings with a `%` suffix are read as percentages.
/// Anything else out of range is discarded.
#[must_use]
pub fn coerce_ratio(value: Option<&Value>) -> Option<f64> {
    if let Some(Value::String(s)) = value {
        if let Some(stripped) = s.trim().strip_suffix('%') {
            let pct = stripped.trim().parse::<f64>().ok()?;
            return (0.0..=100.0).contains(&pct).then_some(pct / 100.0);
        }
    }

    let n = coerce_number(value)?;
    if (0.0..=1.0).contains(&n) {
        Some(n)
    } else if n > 1.0 && n <= 100.0 {
        Some(n / 100.0)
    } else {
        None
    }
}

/// Reads a duration in seconds from a number, numeric string, ISO-8601
/// duration (`PT1H2M3S`) or clock string (`1:02:03`). Unknown forms give `0`.
#[must_use]
pub fn parse_duration_value(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.starts_with(['P', 'p']) {
                parse_iso8601_duration(s).unwrap_or(0)
            } else if s.contains(':') {
                parse_clock_duration(s).unwrap_or(0)
            } else {
                coerce_count(value)
            }
        }
        other => coerce_count(other),
    }
}

/// Parses an ISO-8601 duration as returned by the YouTube Data API.
///
/// Supports weeks, days, hours, minutes and (fractional) seconds. Years and
/// months have no fixed length and are rejected.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_iso8601_duration(s: &str) -> Option<u64> {
    let upper = s.trim().to_ascii_uppercase();
    let body = upper.strip_prefix('P')?;
    if body.is_empty() {
        return None;
    }

    let mut total = 0.0_f64;
    let mut number = String::new();
    let mut in_time = false;
    let mut saw_component = false;

    for c in body.chars() {
        match c {
            '0'..='9' | '.' | ',' => number.push(if c == ',' { '.' } else { c }),
            'T' => {
                if in_time || !number.is_empty() {
                    return None;
                }
                in_time = true;
            }
            unit => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                let seconds = match (unit, in_time) {
                    ('W', false) => 604_800.0,
                    ('D', false) => 86_400.0,
                    ('H', true) => 3_600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return None,
                };
                total += value * seconds;
                saw_component = true;
            }
        }
    }

    if !number.is_empty() || !saw_component {
        return None;
    }
    Some(total.round() as u64)
}

/// Parses `M:SS` or `H:MM:SS`.
#[must_use]
pub fn parse_clock_duration(s: &str) -> Option<u64> {
    let parts: Vec<u64> = s
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [m, sec] if *sec < 60 => Some(m * 60 + sec),
        [h, m, sec] if *m < 60 && *sec < 60 => Some(h * 3_600 + m * 60 + sec),
        _ => None,
    }
}

/// Parses a publish timestamp. Zone-less forms are read as UTC.
#[must_use]
pub fn parse_published_at(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
