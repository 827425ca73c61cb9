//! Pattern rules: named title predicates, the built-in rule sets, and the
//! optional YAML override file.
//!
//! Three rule lists are configured independently: title patterns (frequency
//! analysis), content types (first-match classification) and content gaps
//! (competitor corpus comparison). A stopword list for keyword extraction sits
//! alongside them in [`RuleBook`].

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Reserved label for videos no content-type rule matches.
pub const OTHER_LABEL: &str = "Other";

/// Serializable description of a [`PatternRule`].
///
/// Exactly one of `pattern` or `keywords` must be set. Keywords are matched
/// case-insensitively on word boundaries; `pattern` is a raw regex and honours
/// `case_sensitive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Display-only metadata; no analyzer uses it in a calculation.
    #[serde(default)]
    pub weight_hint: Option<f64>,
}

/// A named predicate over a video title.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    matcher: Regex,
    weight_hint: Option<f64>,
}

impl PatternRule {
    /// Build a rule from a raw regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if `pattern` does not compile.
    pub fn regex(name: &str, pattern: &str) -> Result<Self, ConfigError> {
        let matcher = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            rule: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            matcher,
            weight_hint: None,
        })
    }

    /// Build a rule matching any of `keywords`, case-insensitively.
    ///
    /// A keyword is anchored on a word boundary at each end that is itself a
    /// word character, so `"vs."` still matches `"Mac vs. PC"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when `keywords` is empty and
    /// [`ConfigError::InvalidPattern`] if the combined pattern fails to compile.
    pub fn keywords<S: AsRef<str>>(name: &str, keywords: &[S]) -> Result<Self, ConfigError> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(keyword_alternative)
            .collect();
        if alternatives.is_empty() {
            return Err(ConfigError::Validation(format!(
                "rule '{name}' has no keywords"
            )));
        }
        Self::regex(name, &format!("(?i)(?:{})", alternatives.join("|")))
    }

    /// Compile a [`RuleSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the spec sets neither or both of
    /// `pattern`/`keywords`, or the pattern is invalid.
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, ConfigError> {
        let rule = match (&spec.pattern, spec.keywords.is_empty()) {
            (Some(pattern), true) => {
                let pattern = if spec.case_sensitive {
                    pattern.clone()
                } else {
                    format!("(?i){pattern}")
                };
                Self::regex(&spec.name, &pattern)?
            }
            (None, false) => Self::keywords(&spec.name, &spec.keywords)?,
            (Some(_), false) => {
                return Err(ConfigError::Validation(format!(
                    "rule '{}' sets both pattern and keywords",
                    spec.name
                )))
            }
            (None, true) => {
                return Err(ConfigError::Validation(format!(
                    "rule '{}' needs a pattern or keywords",
                    spec.name
                )))
            }
        };
        Ok(rule.with_weight_hint(spec.weight_hint))
    }

    #[must_use]
    pub fn with_weight_hint(mut self, weight_hint: Option<f64>) -> Self {
        self.weight_hint = weight_hint;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn weight_hint(&self) -> Option<f64> {
        self.weight_hint
    }

    /// Whether the predicate holds for `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

fn keyword_alternative(keyword: &str) -> String {
    let escaped = regex::escape(keyword);
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(keyword.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(keyword.chars().last()) { r"\b" } else { "" };
    format!("{lead}{escaped}{trail}")
}

/// Built-in rule, compiled from known-good literals.
fn builtin_regex(name: &str, pattern: &str, weight_hint: f64) -> PatternRule {
    PatternRule::regex(name, pattern)
        .expect("valid built-in rule regex")
        .with_weight_hint(Some(weight_hint))
}

fn builtin_keywords(name: &str, keywords: &[&str], weight_hint: f64) -> PatternRule {
    PatternRule::keywords(name, keywords)
        .expect("valid built-in keyword rule")
        .with_weight_hint(Some(weight_hint))
}

/// Stylistic title features checked by the title pattern analyzer.
#[must_use]
pub fn default_title_patterns() -> Vec<PatternRule> {
    vec![
        builtin_regex("Question Titles", r"\?", 1.0),
        builtin_regex("Numbers", r"\d", 1.0),
        builtin_regex(
            "List Titles",
            r"(?i)\btop\s+\d+\b|\b\d+\s+(?:best|ways|things|tips|reasons|mistakes|ideas|tricks|secrets)\b",
            1.2,
        ),
        builtin_regex("ALL CAPS Words", r"\b[A-Z]{3,}\b", 0.8),
        builtin_regex("Brackets", r"[\[\(\{]", 0.9),
        builtin_regex("Exclamation", r"!", 0.7),
        builtin_regex("Separator Structure", r"\s[|\-–—]\s|:\s", 0.6),
        builtin_keywords("How-to", &["how to", "how i"], 1.1),
        builtin_keywords("First Person", &["i", "i'm", "my", "me", "we"], 0.8),
        builtin_keywords(
            "Power Words",
            &[
                "ultimate",
                "secret",
                "secrets",
                "best",
                "amazing",
                "insane",
                "shocking",
                "incredible",
                "epic",
                "perfect",
                "proven",
                "easy",
                "simple",
                "free",
            ],
            1.0,
        ),
        builtin_keywords(
            "Negative Framing",
            &[
                "never", "worst", "stop", "mistake", "mistakes", "avoid", "don't", "wrong",
                "fail", "failed",
            ],
            0.9,
        ),
        builtin_regex("Versus", r"(?i)\b(?:vs\.?|versus)\b", 1.0),
        builtin_regex("Year Reference", r"\b(?:19|20)\d{2}\b", 0.7),
        builtin_regex("Emoji", r"\p{Extended_Pictographic}", 0.6),
    ]
}

/// Mutually exclusive content types, evaluated first-match-wins in this order.
#[must_use]
pub fn default_content_type_rules() -> Vec<PatternRule> {
    vec![
        builtin_keywords(
            "Tutorial",
            &["how to", "tutorial", "guide", "step by step", "learn", "course"],
            1.0,
        ),
        builtin_keywords(
            "Review",
            &["review", "unboxing", "hands-on", "first look", "tested", "worth it"],
            1.0,
        ),
        builtin_regex("Comparison", r"(?i)\b(?:vs\.?|versus|compared|comparison)\b", 1.0),
        builtin_regex(
            "List",
            r"(?i)\btop\s+\d+\b|\b\d+\s+(?:best|ways|things|tips|reasons|mistakes|ideas)\b|\branking\b|\btier list\b",
            1.0,
        ),
        builtin_keywords("Reaction", &["react", "reacts", "reacting", "reaction"], 1.0),
        builtin_keywords("Challenge", &["challenge", "24 hours", "for a week"], 1.0),
        builtin_keywords(
            "Vlog",
            &["vlog", "day in the life", "behind the scenes", "my day", "come with me"],
            1.0,
        ),
        builtin_keywords(
            "Interview",
            &["interview", "podcast", "q&a", "conversation with", "ft.", "feat."],
            1.0,
        ),
        builtin_keywords(
            "News",
            &["news", "update", "announced", "breaking", "leaked", "just dropped"],
            1.0,
        ),
        builtin_keywords("Live", &["live", "livestream", "stream", "premiere"], 1.0),
        builtin_keywords("Shorts", &["#shorts", "#short"], 1.0),
    ]
}

/// Topical and stylistic patterns compared between competitors and the subject.
#[must_use]
pub fn default_content_gap_rules() -> Vec<PatternRule> {
    vec![
        builtin_keywords(
            "How-to tutorials",
            &["how to", "tutorial", "step by step"],
            1.0,
        ),
        builtin_regex(
            "Listicles & rankings",
            r"(?i)\btop\s+\d+\b|\branked\b|\branking\b|\btier list\b",
            1.0,
        ),
        builtin_keywords("Product reviews", &["review", "unboxing", "hands-on"], 1.0),
        builtin_regex("Comparisons", r"(?i)\b(?:vs\.?|versus|comparison)\b", 1.0),
        builtin_keywords("Challenges", &["challenge"], 1.0),
        builtin_keywords("Reactions", &["react", "reacts", "reacting", "reaction"], 1.0),
        builtin_keywords(
            "Beginner guides",
            &["beginner", "beginners", "basics", "explained", "for dummies"],
            1.0,
        ),
        builtin_keywords(
            "Behind the scenes",
            &["behind the scenes", "bts", "day in the life"],
            1.0,
        ),
        builtin_keywords(
            "Q&A",
            &["q&a", "ask me anything", "answering your questions"],
            1.0,
        ),
        builtin_keywords(
            "Mistakes to avoid",
            &["mistake", "mistakes", "avoid", "don't do"],
            1.0,
        ),
        builtin_keywords(
            "Experiments & results",
            &["i tried", "experiment", "results", "case study"],
            1.0,
        ),
        builtin_keywords("Myth busting", &["myth", "myths", "truth about"], 1.0),
        builtin_keywords("Trends & news", &["trend", "trending", "news"], 1.0),
    ]
}

/// English stopwords dropped from keyword extraction.
#[must_use]
pub fn default_stopwords() -> BTreeSet<String> {
    [
        "the", "and", "for", "are", "but", "not", "you", "your", "all", "any", "can", "had",
        "her", "was", "one", "our", "out", "has", "have", "his", "how", "its", "into", "just",
        "more", "most", "new", "now", "off", "only", "over", "than", "that", "them", "then",
        "there", "these", "they", "this", "those", "too", "very", "what", "when", "where",
        "which", "who", "why", "will", "with", "without", "from", "about", "after", "again",
        "also", "been", "being", "did", "does", "doing", "each", "get", "got", "here", "him",
        "some", "such", "their", "were", "would", "could", "should", "every", "ever", "make",
        "made", "really", "video", "videos",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// The four configuration lists the analyzers consume.
#[derive(Debug, Clone)]
pub struct RuleBook {
    pub title_patterns: Vec<PatternRule>,
    pub content_types: Vec<PatternRule>,
    pub content_gaps: Vec<PatternRule>,
    pub stopwords: BTreeSet<String>,
}

impl Default for RuleBook {
    fn default() -> Self {
        Self {
            title_patterns: default_title_patterns(),
            content_types: default_content_type_rules(),
            content_gaps: default_content_gap_rules(),
            stopwords: default_stopwords(),
        }
    }
}

/// On-disk shape of a rules override file. Omitted lists keep their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub title_patterns: Option<Vec<RuleSpec>>,
    #[serde(default)]
    pub content_types: Option<Vec<RuleSpec>>,
    #[serde(default)]
    pub content_gaps: Option<Vec<RuleSpec>>,
    #[serde(default)]
    pub stopwords: Option<Vec<String>>,
}

impl RuleBook {
    /// Parse and validate a rules file from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or any list fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: RulesFile = serde_yaml::from_str(content)?;
        Self::from_rules_file(&file)
    }

    /// Compile a parsed [`RulesFile`], falling back to defaults per list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a list fails validation or a pattern is invalid.
    pub fn from_rules_file(file: &RulesFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let title_patterns = compile_list("title_patterns", file.title_patterns.as_deref())?
            .unwrap_or(defaults.title_patterns);
        let content_types = compile_list("content_types", file.content_types.as_deref())?
            .unwrap_or(defaults.content_types);
        let content_gaps = compile_list("content_gaps", file.content_gaps.as_deref())?
            .unwrap_or(defaults.content_gaps);

        if content_types.iter().any(|r| r.name() == OTHER_LABEL) {
            return Err(ConfigError::Validation(format!(
                "content_types may not define the reserved '{OTHER_LABEL}' label"
            )));
        }

        let stopwords = file.stopwords.as_ref().map_or(defaults.stopwords, |words| {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        });

        Ok(Self {
            title_patterns,
            content_types,
            content_gaps,
            stopwords,
        })
    }
}

fn compile_list(
    list: &str,
    specs: Option<&[RuleSpec]>,
) -> Result<Option<Vec<PatternRule>>, ConfigError> {
    let Some(specs) = specs else {
        return Ok(None);
    };

    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(specs.len());
    for spec in specs {
        if spec.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{list}: rule name must be non-empty"
            )));
        }
        if !seen.insert(spec.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "{list}: duplicate rule name '{}'",
                spec.name
            )));
        }
        rules.push(PatternRule::from_spec(spec)?);
    }
    Ok(Some(rules))
}

/// Load and validate a rules override file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<RuleBook, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    RuleBook::from_yaml_str(&content)
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
