use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_analysis_config_defaults_when_env_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg, AnalysisConfig::default());
    assert_eq!(cfg.duration_threshold_secs, 180);
    assert_eq!(cfg.min_sample_size, 2);
    assert_eq!(cfg.title_min_videos, 10);
    assert!((cfg.title_top_fraction - 0.2).abs() < f64::EPSILON);
    assert_eq!(cfg.title_top_min, 3);
    assert_eq!(cfg.schedule_min_videos, 5);
    assert_eq!(cfg.schedule_min_weeks, 4);
    assert_eq!(cfg.timezone, "UTC");
    assert!((cfg.outlier_min_multiplier - 2.5).abs() < f64::EPSILON);
    assert_eq!(cfg.outlier_window_days, 90);
    assert_eq!(cfg.gap_min_competitors, 2);
    assert_eq!(cfg.gap_examples, 2);
    assert!(cfg.rules_path.is_none());
}

#[test]
fn duration_threshold_override() {
    let mut map = HashMap::new();
    map.insert("YTCI_DURATION_THRESHOLD_SECS", "60");
    let cfg = build_analysis_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.duration_threshold_secs, 60);
}

#[test]
fn duration_threshold_invalid() {
    let mut map = HashMap::new();
    map.insert("YTCI_DURATION_THRESHOLD_SECS", "three minutes");
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YTCI_DURATION_THRESHOLD_SECS"),
        "expected InvalidEnvVar(YTCI_DURATION_THRESHOLD_SECS), got: {result:?}"
    );
}

#[test]
fn outlier_multiplier_override_trims_whitespace() {
    let mut map = HashMap::new();
    map.insert("YTCI_OUTLIER_MIN_MULTIPLIER", " 3.0 ");
    let cfg = build_analysis_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.outlier_min_multiplier - 3.0).abs() < f64::EPSILON);
}

#[test]
fn outlier_multiplier_zero_fails_validation() {
    let mut map = HashMap::new();
    map.insert("YTCI_OUTLIER_MIN_MULTIPLIER", "0");
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("outlier_min_multiplier")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn top_fraction_above_one_fails_validation() {
    let mut map = HashMap::new();
    map.insert("YTCI_TITLE_TOP_FRACTION", "1.5");
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn negative_window_fails_validation() {
    let mut map = HashMap::new();
    map.insert("YTCI_OUTLIER_WINDOW_DAYS", "-1");
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn zero_min_sample_fails_validation() {
    let mut map = HashMap::new();
    map.insert("YTCI_MIN_SAMPLE_SIZE", "0");
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("min_sample_size"))
    );
}

#[test]
fn gap_min_competitors_invalid() {
    let mut map = HashMap::new();
    map.insert("YTCI_GAP_MIN_COMPETITORS", "two");
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YTCI_GAP_MIN_COMPETITORS")
    );
}

#[test]
fn timezone_override() {
    let mut map = HashMap::new();
    map.insert("YTCI_TIMEZONE", "America/Los_Angeles");
    let cfg = build_analysis_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.timezone, "America/Los_Angeles");
}

#[test]
fn blank_timezone_fails_validation() {
    let mut map = HashMap::new();
    map.insert("YTCI_TIMEZONE", "   ");
    let result = build_analysis_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn rules_path_empty_is_none() {
    let mut map = HashMap::new();
    map.insert("YTCI_RULES_PATH", "");
    let cfg = build_analysis_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.rules_path.is_none());
}

#[test]
fn rules_path_set() {
    let mut map = HashMap::new();
    map.insert("YTCI_RULES_PATH", "./config/rules.yaml");
    let cfg = build_analysis_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.rules_path.as_deref(),
        Some(std::path::Path::new("./config/rules.yaml"))
    );
}
