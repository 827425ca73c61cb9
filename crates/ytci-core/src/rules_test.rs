use super::*;

fn rule<'a>(rules: &'a [PatternRule], name: &str) -> &'a PatternRule {
    rules
        .iter()
        .find(|r| r.name() == name)
        .unwrap_or_else(|| panic!("rule '{name}' not found"))
}

// -----------------------------------------------------------------------
// PatternRule construction
// -----------------------------------------------------------------------

#[test]
fn keywords_match_case_insensitively_on_word_boundaries() {
    let r = PatternRule::keywords("How-to", &["how to"]).unwrap();
    assert!(r.is_match("HOW TO bake bread"));
    assert!(!r.is_match("somehow together"));
}

#[test]
fn keywords_with_trailing_punctuation_still_match() {
    let r = PatternRule::keywords("Versus", &["vs."]).unwrap();
    assert!(r.is_match("Mac vs. PC"));
}

#[test]
fn keywords_with_leading_symbol_match() {
    let r = PatternRule::keywords("Shorts", &["#shorts"]).unwrap();
    assert!(r.is_match("Quick tip #Shorts"));
}

#[test]
fn keywords_escape_regex_metacharacters() {
    let r = PatternRule::keywords("Q&A", &["q&a", "c++"]).unwrap();
    assert!(r.is_match("Monthly Q&A"));
    assert!(r.is_match("Learning C++ fast"));
    assert!(!r.is_match("learning c fast"));
}

#[test]
fn keywords_empty_list_fails() {
    let err = PatternRule::keywords::<&str>("Empty", &[]).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("Empty")));
}

#[test]
fn regex_invalid_pattern_fails() {
    let err = PatternRule::regex("Broken", "(unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { ref rule, .. } if rule == "Broken"));
}

#[test]
fn from_spec_pattern_is_case_insensitive_by_default() {
    let spec = RuleSpec {
        name: "Gear".to_string(),
        pattern: Some(r"\bgear\b".to_string()),
        keywords: vec![],
        case_sensitive: false,
        weight_hint: Some(0.5),
    };
    let r = PatternRule::from_spec(&spec).unwrap();
    assert!(r.is_match("My GEAR setup"));
    assert_eq!(r.weight_hint(), Some(0.5));
}

#[test]
fn from_spec_case_sensitive_pattern() {
    let spec = RuleSpec {
        name: "Caps".to_string(),
        pattern: Some(r"\bNEW\b".to_string()),
        keywords: vec![],
        case_sensitive: true,
        weight_hint: None,
    };
    let r = PatternRule::from_spec(&spec).unwrap();
    assert!(r.is_match("NEW drop"));
    assert!(!r.is_match("new drop"));
}

#[test]
fn from_spec_rejects_both_pattern_and_keywords() {
    let spec = RuleSpec {
        name: "Both".to_string(),
        pattern: Some("x".to_string()),
        keywords: vec!["y".to_string()],
        case_sensitive: false,
        weight_hint: None,
    };
    assert!(matches!(
        PatternRule::from_spec(&spec),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn from_spec_rejects_neither_pattern_nor_keywords() {
    let spec = RuleSpec {
        name: "Neither".to_string(),
        pattern: None,
        keywords: vec![],
        case_sensitive: false,
        weight_hint: None,
    };
    assert!(matches!(
        PatternRule::from_spec(&spec),
        Err(ConfigError::Validation(_))
    ));
}

// -----------------------------------------------------------------------
// Built-in rule sets
// -----------------------------------------------------------------------

#[test]
fn default_title_patterns_detect_questions() {
    let rules = default_title_patterns();
    let q = rule(&rules, "Question Titles");
    assert!(q.is_match("Is this the best camera?"));
    assert!(!q.is_match("This is the best camera"));
}

#[test]
fn default_title_patterns_detect_all_caps_words() {
    let rules = default_title_patterns();
    let caps = rule(&rules, "ALL CAPS Words");
    assert!(caps.is_match("This is INSANE"));
    assert!(!caps.is_match("This is Insane"));
}

#[test]
fn default_title_patterns_detect_list_titles() {
    let rules = default_title_patterns();
    let list = rule(&rules, "List Titles");
    assert!(list.is_match("Top 10 Budget Mics"));
    assert!(list.is_match("7 Mistakes Every Beginner Makes"));
    assert!(!list.is_match("Mic review 2024"));
}

#[test]
fn default_title_patterns_detect_year() {
    let rules = default_title_patterns();
    let year = rule(&rules, "Year Reference");
    assert!(year.is_match("Best laptops of 2024"));
    assert!(!year.is_match("Episode 12345"));
}

#[test]
fn default_title_patterns_detect_emoji() {
    let rules = default_title_patterns();
    let emoji = rule(&rules, "Emoji");
    assert!(emoji.is_match("New setup 🔥"));
    assert!(!emoji.is_match("New setup"));
}

#[test]
fn default_rule_names_are_unique_per_list() {
    for rules in [
        default_title_patterns(),
        default_content_type_rules(),
        default_content_gap_rules(),
    ] {
        let names: HashSet<&str> = rules.iter().map(PatternRule::name).collect();
        assert_eq!(names.len(), rules.len());
    }
}

#[test]
fn default_content_types_never_use_reserved_label() {
    assert!(default_content_type_rules()
        .iter()
        .all(|r| r.name() != OTHER_LABEL));
}

#[test]
fn default_gap_rules_include_how_to() {
    let rules = default_content_gap_rules();
    let how_to = rule(&rules, "How-to tutorials");
    assert!(how_to.is_match("How to edit faster in Premiere"));
}

#[test]
fn default_stopwords_are_lowercase() {
    assert!(default_stopwords()
        .iter()
        .all(|w| *w == w.to_lowercase()));
}

// -----------------------------------------------------------------------
// Rules file
// -----------------------------------------------------------------------

#[test]
fn from_yaml_str_overrides_only_given_lists() {
    let yaml = r"
content_types:
  - name: Cooking
    keywords: [recipe, cook]
  - name: Travel
    pattern: '\btrip\b'
stopwords: [Recipe]
";
    let book = RuleBook::from_yaml_str(yaml).unwrap();
    assert_eq!(book.content_types.len(), 2);
    assert_eq!(book.content_types[0].name(), "Cooking");
    assert!(book.content_types[1].is_match("Weekend TRIP"));
    assert_eq!(book.title_patterns.len(), default_title_patterns().len());
    assert_eq!(book.content_gaps.len(), default_content_gap_rules().len());
    assert!(book.stopwords.contains("recipe"));
    assert_eq!(book.stopwords.len(), 1);
}

#[test]
fn from_yaml_str_empty_document_uses_defaults() {
    let book = RuleBook::from_yaml_str("{}").unwrap();
    assert_eq!(book.title_patterns.len(), default_title_patterns().len());
    assert_eq!(book.stopwords, default_stopwords());
}

#[test]
fn from_yaml_str_rejects_duplicate_names() {
    let yaml = r"
title_patterns:
  - name: Hooks
    keywords: [secret]
  - name: hooks
    keywords: [hidden]
";
    let err = RuleBook::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")));
}

#[test]
fn from_yaml_str_rejects_empty_name() {
    let yaml = r"
content_gaps:
  - name: '  '
    keywords: [x]
";
    let err = RuleBook::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("non-empty")));
}

#[test]
fn from_yaml_str_rejects_reserved_other_label() {
    let yaml = r"
content_types:
  - name: Other
    keywords: [misc]
";
    let err = RuleBook::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("reserved")));
}

#[test]
fn from_yaml_str_reports_invalid_pattern() {
    let yaml = r"
title_patterns:
  - name: Broken
    pattern: '(['
";
    let err = RuleBook::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { ref rule, .. } if rule == "Broken"));
}

#[test]
fn from_yaml_str_malformed_yaml_fails() {
    let err = RuleBook::from_yaml_str("title_patterns: [").unwrap_err();
    assert!(matches!(err, ConfigError::RulesFileParse(_)));
}

#[test]
fn load_rules_missing_file_reports_path() {
    let err = load_rules(Path::new("/nonexistent/ytci/rules.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::RulesFileIo { ref path, .. } if path.contains("rules.yaml"))
    );
}
