//! Content gaps: patterns several competitors use that the subject never does.
//!
//! The subject side is a whole-corpus test. Every subject title is joined into
//! one newline-separated string and each rule is matched once against it, so
//! "used at all" is answered with a single regex search per rule. That is not
//! the same as classifying each subject video: a pattern spanning a line break
//! can match the corpus without matching any single title, which makes the
//! test at least as sensitive as a per-video check and therefore reports no
//! more gaps than one.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use ytci_core::{PatternRule, VideoRecord};

use crate::classify::corpus_matches;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapExample {
    pub channel: String,
    pub video_id: String,
    pub title: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentGap {
    pub pattern: String,
    /// Matching competitor videos, across every competitor.
    pub usage_count: usize,
    /// Names of the competitors with at least one match.
    pub competitors: BTreeSet<String>,
    /// Highest-view matching competitor videos.
    pub examples: Vec<GapExample>,
}

/// Patterns used by at least `min_distinct_competitors` competitors that
/// never appear in the subject's title corpus.
///
/// Ordered by distinct competitors, then usage, both descending, then rule
/// order.
#[must_use]
pub fn find_content_gaps(
    subject_videos: &[VideoRecord],
    competitors_by_channel: &BTreeMap<String, Vec<VideoRecord>>,
    rules: &[PatternRule],
    min_distinct_competitors: usize,
    max_examples: usize,
) -> Vec<ContentGap> {
    let subject_corpus = subject_videos
        .iter()
        .map(|v| v.title.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut gaps: Vec<ContentGap> = rules
        .iter()
        .filter_map(|rule| {
            let matches: Vec<(&str, &VideoRecord)> = competitors_by_channel
                .iter()
                .flat_map(|(channel, videos)| {
                    videos
                        .iter()
                        .filter(move |v| rule.is_match(&v.title))
                        .map(move |v| (channel.as_str(), v))
                })
                .collect();

            let competitors: BTreeSet<String> =
                matches.iter().map(|(channel, _)| (*channel).to_string()).collect();
            if matches.is_empty() || competitors.len() < min_distinct_competitors {
                return None;
            }
            if corpus_matches(&subject_corpus, rule) {
                return None;
            }

            let mut ranked = matches.clone();
            ranked.sort_by(|a, b| b.1.views.cmp(&a.1.views));
            let examples = ranked
                .into_iter()
                .take(max_examples)
                .map(|(channel, v)| GapExample {
                    channel: channel.to_string(),
                    video_id: v.id.clone(),
                    title: v.title.clone(),
                    views: v.views,
                })
                .collect();

            Some(ContentGap {
                pattern: rule.name().to_string(),
                usage_count: matches.len(),
                competitors,
                examples,
            })
        })
        .collect();

    // Stable: equal keys keep rule order.
    gaps.sort_by(|a, b| {
        b.competitors
            .len()
            .cmp(&a.competitors.len())
            .then(b.usage_count.cmp(&a.usage_count))
    });
    tracing::debug!(gaps = gaps.len(), rules = rules.len(), "content gap scan complete");
    gaps
}
