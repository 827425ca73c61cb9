//! Competitive content intelligence over normalized YouTube video records.
//!
//! Raw records are normalized once, then fed to independent, pure analyzers:
//! title patterns, upload schedule, format mix, benchmark gaps, outliers and
//! content gaps. [`build_report`] runs all of them for one subject channel.

pub mod analysis;
pub mod benchmark;
pub mod classify;
pub mod error;
pub mod formats;
pub mod gaps;
pub mod normalize;
pub mod outliers;
pub mod report;
pub mod schedule;
pub mod stats;
pub mod titles;

pub use analysis::{Analysis, PatternStats, VideoSummary};
pub use benchmark::{
    benchmark_channel, compute_benchmark_gap, compute_benchmark_gap_with_floor, weighted_mean,
    BenchmarkGap, BenchmarkMetric, ChannelBenchmark, ChannelMetrics, MetricGap, RATIO_GAP_FLOOR,
};
pub use classify::{classify_first, corpus_matches, match_all};
pub use error::EngineError;
pub use formats::{categorize_formats, FormatAnalysis, FormatBucket};
pub use gaps::{find_content_gaps, ContentGap, GapExample};
pub use normalize::{count_unusable, normalize, normalize_all, normalize_channel, MAX_COUNT};
pub use outliers::{
    detect_channel_outliers, detect_outliers, detect_outliers_with_min_baseline, OutlierVideo,
    MIN_BASELINE_VIDEOS,
};
pub use report::{build_report, videos_by_channel, CompetitiveReport, RecordCounts};
pub use schedule::{analyze_upload_schedule, ScheduleBucket, ScheduleProfile, TimeBlock};
pub use titles::{analyze_title_patterns, KeywordCount, TitleAnalysis, TitlePattern};
