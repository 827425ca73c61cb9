//! Channel export loading and subject/competitor selection.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ytci_core::{ChannelSnapshot, RawChannel};

/// Top-level shape of an input file.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelExport {
    pub channels: Vec<RawChannel>,
}

/// Read and normalize every channel in a JSON export.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid export.
pub(crate) fn load_channels(
    path: &Path,
    duration_threshold_secs: u64,
) -> anyhow::Result<Vec<ChannelSnapshot>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    parse_channels(&body, duration_threshold_secs)
        .with_context(|| format!("failed to parse input file {}", path.display()))
}

pub(crate) fn parse_channels(
    body: &str,
    duration_threshold_secs: u64,
) -> anyhow::Result<Vec<ChannelSnapshot>> {
    let export: ChannelExport = serde_json::from_str(body)?;
    let channels: Vec<ChannelSnapshot> = export
        .channels
        .iter()
        .map(|raw| ytci_engine::normalize_channel(raw, duration_threshold_secs))
        .collect();
    for channel in &channels {
        let skipped = ytci_engine::count_unusable(&channel.videos);
        if skipped > 0 {
            tracing::warn!(
                channel = %channel.name,
                skipped,
                total = channel.videos.len(),
                "records skipped as undated or with negative counts"
            );
        }
    }
    Ok(channels)
}

/// Split `channels` into the channel named `subject` (by name or id,
/// case-insensitive) and everything else.
///
/// # Errors
///
/// Returns an error if no channel matches `subject`.
pub(crate) fn split_subject(
    channels: Vec<ChannelSnapshot>,
    subject: &str,
) -> anyhow::Result<(ChannelSnapshot, Vec<ChannelSnapshot>)> {
    let index = find_channel(&channels, subject)
        .ok_or_else(|| anyhow::anyhow!("channel '{subject}' not found in input"))?;
    let mut rest = channels;
    let chosen = rest.remove(index);
    Ok((chosen, rest))
}

pub(crate) fn find_channel(channels: &[ChannelSnapshot], name: &str) -> Option<usize> {
    let wanted = name.trim();
    channels
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(wanted) || c.id.eq_ignore_ascii_case(wanted))
}

/// `--as-of` as RFC 3339, defaulting to now.
///
/// # Errors
///
/// Returns an error if the value is not RFC 3339.
pub(crate) fn resolve_as_of(as_of: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match as_of {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw.trim())
            .with_context(|| format!("invalid --as-of timestamp '{raw}'"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}
