use serde_json::json;

use super::*;
use crate::input::parse_channels;

fn fixture_channels() -> Vec<ChannelSnapshot> {
    let export = json!({
        "channels": [
            {
                "id": "UC_subject",
                "name": "Studio North",
                "subscriber_count": "12000",
                "videos": [
                    {"id": "s1", "title": "Desk setup 2024", "published_at": "2024-05-01T15:00:00Z", "duration": "PT10M", "views": 1000, "likes": 50},
                    {"id": "s2", "title": "Lens talk", "published_at": "2024-05-08T15:00:00Z", "duration": "PT8M", "views": 1000, "likes": 40},
                    {"id": "s3", "title": "Camera bag tour", "published_at": "2024-05-15T15:00:00Z", "duration": "0:45", "views": 1000},
                    {"id": "s4", "title": "Editing desk", "published_at": "2024-05-22T15:00:00Z", "duration": 700, "views": 1000},
                    {"id": "s5", "title": "Breakout shot", "published_at": "2024-05-29T15:00:00Z", "duration": 640, "views": 9000},
                    {"id": "s6", "title": "Broken row", "published_at": "not a date", "views": -3}
                ]
            },
            {
                "name": "Alpha",
                "videos": [
                    {"id": "a1", "title": "How to frame a shot", "published_at": "2024-05-02", "views": 4000},
                    {"id": "a2", "title": "Gear haul", "published_at": "2024-05-09", "views": 1000}
                ]
            },
            {
                "name": "Beta",
                "videos": [
                    {"id": "b1", "title": "How to grade footage", "published_at": "2024-05-03", "views": 9000},
                    {"id": "b2", "title": "Weekend shoot", "published_at": "2024-05-10", "views": 2000}
                ]
            }
        ]
    });
    parse_channels(&export.to_string(), 180).expect("valid fixture")
}

fn run_args(args: &[&str]) -> serde_json::Value {
    let cli = Cli::try_parse_from(args).expect("expected valid cli args");
    run(
        &cli.command,
        fixture_channels(),
        &RuleBook::default(),
        &AnalysisConfig::default(),
    )
    .expect("command should succeed")
}

// ---------------------------------------------------------------------------
// argument parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_report_command() {
    let cli = Cli::try_parse_from([
        "ytci-cli",
        "report",
        "--input",
        "channels.json",
        "--subject",
        "Studio North",
        "--as-of",
        "2024-06-01T00:00:00Z",
    ])
    .expect("expected valid cli args");

    assert!(cli.rules.is_none());
    assert!(matches!(
        cli.command,
        Commands::Report {
            ref subject,
            as_of: Some(_),
            timezone: None,
            ..
        } if subject == "Studio North"
    ));
    assert_eq!(cli.command.input(), Path::new("channels.json"));
}

#[test]
fn rules_flag_is_global() {
    let cli = Cli::try_parse_from([
        "ytci-cli",
        "titles",
        "--input",
        "in.json",
        "--channel",
        "Alpha",
        "--rules",
        "rules.yaml",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.rules.as_deref(), Some(Path::new("rules.yaml")));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["ytci-cli"]).is_err());
}

#[test]
fn schedule_requires_channel() {
    assert!(Cli::try_parse_from(["ytci-cli", "schedule", "--input", "in.json"]).is_err());
}

// ---------------------------------------------------------------------------
// input handling
// ---------------------------------------------------------------------------

#[test]
fn parse_channels_normalizes_every_channel() {
    let channels = fixture_channels();
    assert_eq!(channels.len(), 3);
    assert_eq!(channels[0].subscriber_count, 12_000);
    assert_eq!(channels[1].id, "Alpha");
    assert_eq!(ytci_engine::count_unusable(&channels[0].videos), 1);
}

#[test]
fn parse_channels_rejects_wrong_shape() {
    assert!(parse_channels(r#"{"videos": []}"#, 180).is_err());
}

#[test]
fn split_subject_matches_name_or_id_case_insensitively() {
    let (subject, rest) = split_subject(fixture_channels(), "studio north").unwrap();
    assert_eq!(subject.name, "Studio North");
    assert_eq!(rest.len(), 2);

    let (by_id, _) = split_subject(fixture_channels(), "UC_SUBJECT").unwrap();
    assert_eq!(by_id.name, "Studio North");

    assert!(split_subject(fixture_channels(), "Nobody").is_err());
}

#[test]
fn resolve_as_of_parses_rfc3339() {
    let as_of = resolve_as_of(Some("2024-06-01T02:00:00+02:00")).unwrap();
    assert_eq!(as_of.to_rfc3339(), "2024-06-01T00:00:00+00:00");
    assert!(resolve_as_of(Some("June 1st")).is_err());
}

// ---------------------------------------------------------------------------
// commands
// ---------------------------------------------------------------------------

#[test]
fn titles_on_small_channel_reports_insufficient_data() {
    let output = run_args(&["ytci-cli", "titles", "--input", "x", "--channel", "Studio North"]);
    assert_eq!(output["status"], "insufficient_data");
    assert_eq!(output["required"], 10);
    assert_eq!(output["available"], 5);
}

#[test]
fn schedule_uses_timezone_flag() {
    let output = run_args(&[
        "ytci-cli",
        "schedule",
        "--input",
        "x",
        "--channel",
        "Studio North",
        "--timezone",
        "America/New_York",
    ]);
    assert_eq!(output["status"], "ready");
    assert_eq!(output["timezone"], "America/New_York");
    assert_eq!(output["best_day"], "Wednesday");
    assert_eq!(output["records_skipped"], 1);
}

#[test]
fn schedule_with_unknown_timezone_fails() {
    let cli = Cli::try_parse_from([
        "ytci-cli",
        "schedule",
        "--input",
        "x",
        "--channel",
        "Studio North",
        "--timezone",
        "Nowhere/Special",
    ])
    .unwrap();
    let result = run(
        &cli.command,
        fixture_channels(),
        &RuleBook::default(),
        &AnalysisConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn outliers_for_one_channel() {
    let output = run_args(&[
        "ytci-cli",
        "outliers",
        "--input",
        "x",
        "--channel",
        "Studio North",
        "--as-of",
        "2024-06-01T00:00:00Z",
    ]);
    let outliers = output.as_array().unwrap();
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0]["video_id"], "s5");
    assert_eq!(outliers[0]["channel"], "Studio North");
}

#[test]
fn gaps_find_how_to_tutorials() {
    let output = run_args(&["ytci-cli", "gaps", "--input", "x", "--subject", "Studio North"]);
    let gaps = output.as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["pattern"], "How-to tutorials");
    assert_eq!(gaps[0]["competitors"], json!(["Alpha", "Beta"]));
}

#[test]
fn benchmark_and_report_run_end_to_end() {
    let benchmark = run_args(&["ytci-cli", "benchmark", "--input", "x", "--subject", "Studio North"]);
    assert_eq!(benchmark["subject"]["channel"], "Studio North");
    assert_eq!(benchmark["competitors"].as_array().unwrap().len(), 2);

    let report = run_args(&[
        "ytci-cli",
        "report",
        "--input",
        "x",
        "--subject",
        "Studio North",
        "--as-of",
        "2024-06-01T00:00:00Z",
    ]);
    assert_eq!(report["subject"], "Studio North");
    assert_eq!(report["records"]["skipped"], 1);
    assert_eq!(report["schedule"]["status"], "ready");
    assert_eq!(report["content_gaps"].as_array().unwrap().len(), 1);
}

#[test]
fn formats_lists_duration_buckets() {
    let output = run_args(&["ytci-cli", "formats", "--input", "x", "--channel", "Studio North"]);
    assert_eq!(output["total_videos"], 6);
    assert_eq!(output["invalid_counts"], 1);
    assert_eq!(output["durations"][0]["name"], "Shorts");
    assert_eq!(output["durations"][0]["count"], 1);
}
