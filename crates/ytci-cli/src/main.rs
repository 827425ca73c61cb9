mod input;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use ytci_core::{AnalysisConfig, ChannelSnapshot, RuleBook};

use crate::input::{find_channel, load_channels, resolve_as_of, split_subject};

#[derive(Debug, Parser)]
#[command(name = "ytci-cli")]
#[command(about = "YouTube competitive content intelligence")]
struct Cli {
    /// YAML rules file replacing the built-in pattern lists
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Full competitive report for one channel against the rest of the input
    Report {
        /// JSON channel export
        #[arg(long)]
        input: PathBuf,
        /// Subject channel name or id
        #[arg(long)]
        subject: String,
        /// Reference instant for outlier recency (RFC 3339, default now)
        #[arg(long)]
        as_of: Option<String>,
        /// IANA timezone for schedule buckets (overrides `YTCI_TIMEZONE`)
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Title patterns over-represented in a channel's top videos
    Titles {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        channel: String,
    },
    /// Upload schedule performance by local day and time
    Schedule {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        channel: String,
        /// IANA timezone (overrides `YTCI_TIMEZONE`)
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Content-type and duration mix
    Formats {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        channel: String,
    },
    /// Recent videos far above their channel's mean views
    Outliers {
        #[arg(long)]
        input: PathBuf,
        /// Limit to one channel (default: every channel in the input)
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Patterns competitors use that the subject never does
    Gaps {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        subject: String,
    },
    /// Per-metric gaps between the subject and the competitor mean
    Benchmark {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        subject: String,
    },
}

impl Commands {
    fn input(&self) -> &Path {
        match self {
            Commands::Report { input, .. }
            | Commands::Titles { input, .. }
            | Commands::Schedule { input, .. }
            | Commands::Formats { input, .. }
            | Commands::Outliers { input, .. }
            | Commands::Gaps { input, .. }
            | Commands::Benchmark { input, .. } => input,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = ytci_core::load_analysis_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = load_rule_book(cli.rules.as_deref().or(config.rules_path.as_deref()))?;
    let channels = load_channels(cli.command.input(), config.duration_threshold_secs)?;
    tracing::debug!(channels = channels.len(), "input loaded");

    let output = run(&cli.command, channels, &rules, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_rule_book(path: Option<&Path>) -> anyhow::Result<RuleBook> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading rules file");
            ytci_core::load_rules(path)
                .with_context(|| format!("failed to load rules from {}", path.display()))
        }
        None => Ok(RuleBook::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

fn single_channel(channels: Vec<ChannelSnapshot>, name: &str) -> anyhow::Result<ChannelSnapshot> {
    split_subject(channels, name).map(|(channel, _)| channel)
}

/// Execute `command` over already-loaded channels and return its JSON output.
fn run(
    command: &Commands,
    channels: Vec<ChannelSnapshot>,
    rules: &RuleBook,
    config: &AnalysisConfig,
) -> anyhow::Result<serde_json::Value> {
    match command {
        Commands::Report {
            subject,
            as_of,
            timezone,
            ..
        } => {
            let as_of = resolve_as_of(as_of.as_deref())?;
            let mut config = config.clone();
            if let Some(tz) = timezone {
                config.timezone.clone_from(tz);
            }
            let (subject, competitors) = split_subject(channels, subject)?;
            let report =
                ytci_engine::build_report(&subject, &competitors, rules, &config, as_of)?;
            to_json(&report)
        }
        Commands::Titles { channel, .. } => {
            let channel = single_channel(channels, channel)?;
            to_json(&ytci_engine::analyze_title_patterns(
                &channel.videos,
                &rules.title_patterns,
                &rules.stopwords,
                config,
            ))
        }
        Commands::Schedule {
            channel, timezone, ..
        } => {
            let channel = single_channel(channels, channel)?;
            let tz = timezone.as_deref().unwrap_or(&config.timezone);
            to_json(&ytci_engine::analyze_upload_schedule(
                &channel.videos,
                tz,
                config,
            )?)
        }
        Commands::Formats { channel, .. } => {
            let channel = single_channel(channels, channel)?;
            to_json(&ytci_engine::categorize_formats(
                &channel.videos,
                &rules.content_types,
                config.duration_threshold_secs,
            ))
        }
        Commands::Outliers { channel, as_of, .. } => {
            let as_of = resolve_as_of(as_of.as_deref())?;
            let selected = match channel {
                Some(name) => {
                    let index = find_channel(&channels, name)
                        .ok_or_else(|| anyhow::anyhow!("channel '{name}' not found in input"))?;
                    vec![channels[index].clone()]
                }
                None => channels,
            };
            to_json(&ytci_engine::detect_channel_outliers(
                &selected,
                config.outlier_min_multiplier,
                config.outlier_window_days,
                config.outlier_min_videos,
                as_of,
            ))
        }
        Commands::Gaps { subject, .. } => {
            let (subject, competitors) = split_subject(channels, subject)?;
            to_json(&ytci_engine::find_content_gaps(
                &subject.videos,
                &ytci_engine::videos_by_channel(&competitors),
                &rules.content_gaps,
                config.gap_min_competitors,
                config.gap_examples,
            ))
        }
        Commands::Benchmark { subject, .. } => {
            let (subject, competitors) = split_subject(channels, subject)?;
            to_json(&ytci_engine::benchmark_channel(
                &subject,
                &competitors,
                config,
            ))
        }
    }
}

#[cfg(test)]
mod tests;
