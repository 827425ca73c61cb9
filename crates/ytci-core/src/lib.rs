//! Shared data model and configuration for the YTCI content intelligence engine.
//!
//! Video and channel records, pattern rules with their built-in defaults, and
//! the threshold configuration consumed by every analyzer in `ytci-engine`.

pub mod analysis_config;
pub mod config;
pub mod error;
pub mod rules;
pub mod video;

pub use analysis_config::{AnalysisConfig, DEFAULT_BENCHMARK_FLOOR, DEFAULT_SHORT_THRESHOLD_SECS};
pub use config::{load_analysis_config, load_analysis_config_from_env};
pub use error::ConfigError;
pub use rules::{
    default_content_gap_rules, default_content_type_rules, default_stopwords,
    default_title_patterns, load_rules, PatternRule, RuleBook, RuleSpec, RulesFile, OTHER_LABEL,
};
pub use video::{ChannelSnapshot, RawChannel, RawVideo, VideoRecord, VideoType};
