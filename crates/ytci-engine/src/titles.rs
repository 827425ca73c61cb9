//! Title pattern analysis: which stylistic features are over-represented in
//! a channel's best-performing videos.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use ytci_core::{AnalysisConfig, PatternRule, VideoRecord};

use crate::analysis::{Analysis, PatternStats, VideoSummary};
use crate::classify::match_all;
use crate::stats::mean;

/// Example IDs kept per pattern.
const PATTERN_EXAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitlePattern {
    pub name: String,
    pub weight_hint: Option<f64>,
    pub top_matches: usize,
    pub all_matches: usize,
    /// `top_matches / |top|`.
    pub top_frequency: f64,
    /// `all_matches / |all|`.
    pub all_frequency: f64,
    /// `top_frequency / all_frequency`; `0.0` when the pattern never occurs.
    pub lift: f64,
    /// Aggregate over every matching video in the full population.
    pub stats: PatternStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    /// Number of top-subset titles containing the word.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleAnalysis {
    pub sample_size: usize,
    pub top_count: usize,
    pub records_skipped: usize,
    /// Retained patterns, by `top_frequency` descending.
    pub patterns: Vec<TitlePattern>,
    pub avg_title_length_top: f64,
    pub avg_title_length_all: f64,
    pub top_keywords: Vec<KeywordCount>,
    /// Most-viewed videos, passed through for display.
    pub top_videos: Vec<VideoSummary>,
}

/// Compare pattern frequency in the top-performing subset against the full
/// population.
///
/// Records with invalid counts are skipped. The top subset is the
/// `title_top_fraction` share of videos by views (at least `title_top_min`);
/// equal view counts keep input order. A pattern is reported only when at
/// least `min_sample_size` top videos use it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze_title_patterns(
    videos: &[VideoRecord],
    rules: &[PatternRule],
    stopwords: &BTreeSet<String>,
    config: &AnalysisConfig,
) -> Analysis<TitleAnalysis> {
    let valid: Vec<&VideoRecord> = videos.iter().filter(|v| v.counts_valid).collect();
    let records_skipped = videos.len() - valid.len();

    if valid.len() < config.title_min_videos {
        tracing::debug!(
            available = valid.len(),
            required = config.title_min_videos,
            "not enough videos for title pattern analysis"
        );
        return Analysis::InsufficientData {
            required: config.title_min_videos,
            available: valid.len(),
        };
    }

    let mut ranked = valid.clone();
    ranked.sort_by(|a, b| b.views.cmp(&a.views));

    let top_count = top_subset_size(ranked.len(), config.title_top_fraction, config.title_top_min);
    let top = &ranked[..top_count];

    let top_matches_per_video: Vec<Vec<&str>> =
        top.iter().map(|v| match_all(&v.title, rules)).collect();
    let all_matches_per_video: Vec<Vec<&str>> =
        ranked.iter().map(|v| match_all(&v.title, rules)).collect();

    let mut patterns: Vec<TitlePattern> = rules
        .iter()
        .filter_map(|rule| {
            let top_matches = top_matches_per_video
                .iter()
                .filter(|names| names.contains(&rule.name()))
                .count();
            if top_matches < config.min_sample_size {
                return None;
            }

            let matching: Vec<&VideoRecord> = ranked
                .iter()
                .zip(&all_matches_per_video)
                .filter(|(_, names)| names.contains(&rule.name()))
                .map(|(v, _)| *v)
                .collect();
            let stats =
                PatternStats::from_videos(&matching, config.min_sample_size, PATTERN_EXAMPLES)?;

            let top_frequency = top_matches as f64 / top_count as f64;
            let all_frequency = matching.len() as f64 / ranked.len() as f64;
            let lift = if all_frequency > 0.0 {
                top_frequency / all_frequency
            } else {
                0.0
            };

            Some(TitlePattern {
                name: rule.name().to_string(),
                weight_hint: rule.weight_hint(),
                top_matches,
                all_matches: matching.len(),
                top_frequency,
                all_frequency,
                lift,
                stats,
            })
        })
        .collect();
    patterns.sort_by(|a, b| b.top_frequency.total_cmp(&a.top_frequency));

    let lengths = |set: &[&VideoRecord]| -> f64 {
        let values: Vec<f64> = set.iter().map(|v| v.title_length() as f64).collect();
        mean(&values)
    };

    Analysis::Ready(TitleAnalysis {
        sample_size: ranked.len(),
        top_count,
        records_skipped,
        patterns,
        avg_title_length_top: lengths(top),
        avg_title_length_all: lengths(&ranked),
        top_keywords: top_keywords(top, stopwords, config.title_keyword_limit),
        top_videos: ranked
            .iter()
            .take(config.title_top_videos_shown)
            .map(|v| VideoSummary::from(*v))
            .collect(),
    })
}

/// `max(ceil(n * fraction), min)`, capped at `n`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn top_subset_size(n: usize, fraction: f64, min: usize) -> usize {
    // The epsilon keeps 15 * 0.2 from rounding up to 4.
    let by_fraction = (n as f64 * fraction - 1e-9).ceil().max(0.0) as usize;
    by_fraction.max(min).min(n)
}

/// Words recurring across top titles, excluding stopwords, numbers and
/// words shorter than three characters.
fn top_keywords(
    top: &[&VideoRecord],
    stopwords: &BTreeSet<String>,
    limit: usize,
) -> Vec<KeywordCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for video in top {
        let words: HashSet<String> = video
            .title
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|w| w.trim_matches('\'').to_lowercase())
            .filter(|w| w.chars().count() >= 3)
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .filter(|w| !stopwords.contains(w))
            .collect();
        for word in words {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut keywords: Vec<KeywordCount> = counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(word, count)| KeywordCount { word, count })
        .collect();
    // BTreeMap iteration already ordered words ascending; the stable sort keeps that for ties.
    keywords.sort_by(|a, b| b.count.cmp(&a.count));
    keywords.truncate(limit);
    keywords
}

#[cfg(test)]
#[path = "titles_test.rs"]
mod tests;
