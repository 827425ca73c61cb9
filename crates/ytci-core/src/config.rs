use std::path::PathBuf;
use std::str::FromStr;

use crate::analysis_config::AnalysisConfig;
use crate::ConfigError;

/// Load analysis configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_analysis_config() -> Result<AnalysisConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_analysis_config_from_env()
}

/// Load analysis configuration from environment variables already in the process.
///
/// Unlike [`load_analysis_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_analysis_config_from_env() -> Result<AnalysisConfig, ConfigError> {
    build_analysis_config(|key| std::env::var(key))
}

/// Build the configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables keep the
/// [`AnalysisConfig::default`] value.
fn build_analysis_config<F>(lookup: F) -> Result<AnalysisConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AnalysisConfig::default();

    let optional =
        |var: &str| -> Option<String> { lookup(var).ok().map(|raw| raw.trim().to_string()) };

    let cfg = AnalysisConfig {
        duration_threshold_secs: parsed(
            &lookup,
            "YTCI_DURATION_THRESHOLD_SECS",
            defaults.duration_threshold_secs,
        )?,
        min_sample_size: parsed(&lookup, "YTCI_MIN_SAMPLE_SIZE", defaults.min_sample_size)?,
        title_min_videos: parsed(&lookup, "YTCI_TITLE_MIN_VIDEOS", defaults.title_min_videos)?,
        title_top_fraction: parsed(
            &lookup,
            "YTCI_TITLE_TOP_FRACTION",
            defaults.title_top_fraction,
        )?,
        title_top_min: parsed(&lookup, "YTCI_TITLE_TOP_MIN", defaults.title_top_min)?,
        title_top_videos_shown: parsed(
            &lookup,
            "YTCI_TITLE_TOP_VIDEOS_SHOWN",
            defaults.title_top_videos_shown,
        )?,
        title_keyword_limit: parsed(
            &lookup,
            "YTCI_TITLE_KEYWORD_LIMIT",
            defaults.title_keyword_limit,
        )?,
        schedule_min_videos: parsed(
            &lookup,
            "YTCI_SCHEDULE_MIN_VIDEOS",
            defaults.schedule_min_videos,
        )?,
        schedule_min_weeks: parsed(
            &lookup,
            "YTCI_SCHEDULE_MIN_WEEKS",
            defaults.schedule_min_weeks,
        )?,
        timezone: optional("YTCI_TIMEZONE").unwrap_or(defaults.timezone),
        outlier_min_multiplier: parsed(
            &lookup,
            "YTCI_OUTLIER_MIN_MULTIPLIER",
            defaults.outlier_min_multiplier,
        )?,
        outlier_window_days: parsed(
            &lookup,
            "YTCI_OUTLIER_WINDOW_DAYS",
            defaults.outlier_window_days,
        )?,
        outlier_min_videos: parsed(
            &lookup,
            "YTCI_OUTLIER_MIN_VIDEOS",
            defaults.outlier_min_videos,
        )?,
        gap_min_competitors: parsed(
            &lookup,
            "YTCI_GAP_MIN_COMPETITORS",
            defaults.gap_min_competitors,
        )?,
        gap_examples: parsed(&lookup, "YTCI_GAP_EXAMPLES", defaults.gap_examples)?,
        benchmark_floor: parsed(&lookup, "YTCI_BENCHMARK_FLOOR", defaults.benchmark_floor)?,
        log_level: optional("YTCI_LOG_LEVEL").unwrap_or(defaults.log_level),
        rules_path: optional("YTCI_RULES_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
    };

    validate_analysis_config(&cfg)?;
    Ok(cfg)
}

/// Parse `var` with `FromStr`, falling back to `default` when it is unset.
fn parsed<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Reject threshold combinations the analyzers cannot work with.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] naming the first offending field.
pub fn validate_analysis_config(cfg: &AnalysisConfig) -> Result<(), ConfigError> {
    if !(cfg.title_top_fraction > 0.0 && cfg.title_top_fraction <= 1.0) {
        return Err(ConfigError::Validation(format!(
            "title_top_fraction must be in (0, 1], got {}",
            cfg.title_top_fraction
        )));
    }
    if !(cfg.outlier_min_multiplier.is_finite() && cfg.outlier_min_multiplier > 0.0) {
        return Err(ConfigError::Validation(format!(
            "outlier_min_multiplier must be positive, got {}",
            cfg.outlier_min_multiplier
        )));
    }
    if cfg.outlier_window_days < 0 {
        return Err(ConfigError::Validation(format!(
            "outlier_window_days must be non-negative, got {}",
            cfg.outlier_window_days
        )));
    }
    if !(cfg.benchmark_floor.is_finite() && cfg.benchmark_floor > 0.0) {
        return Err(ConfigError::Validation(format!(
            "benchmark_floor must be positive, got {}",
            cfg.benchmark_floor
        )));
    }

    let non_zero = [
        ("min_sample_size", cfg.min_sample_size),
        ("title_min_videos", cfg.title_min_videos),
        ("title_top_min", cfg.title_top_min),
        ("schedule_min_videos", cfg.schedule_min_videos),
        ("outlier_min_videos", cfg.outlier_min_videos),
        ("gap_min_competitors", cfg.gap_min_competitors),
    ];
    for (name, value) in non_zero {
        if value == 0 {
            return Err(ConfigError::Validation(format!("{name} must be at least 1")));
        }
    }

    if cfg.timezone.trim().is_empty() {
        return Err(ConfigError::Validation("timezone must be non-empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
