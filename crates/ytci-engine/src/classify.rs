//! The two rule-evaluation primitives every analyzer shares.
//!
//! - [`match_all`]: every rule that matches, for frequency analysis where a
//!   title may count towards several patterns at once.
//! - [`classify_first`]: the first rule that matches, for mutually exclusive
//!   classification with an [`OTHER_LABEL`] fallback.
//!
//! Rule order only affects the result of [`classify_first`].

use ytci_core::{PatternRule, OTHER_LABEL};

/// Names of all rules matching `title`, in rule order.
#[must_use]
pub fn match_all<'r>(title: &str, rules: &'r [PatternRule]) -> Vec<&'r str> {
    rules
        .iter()
        .filter(|rule| rule.is_match(title))
        .map(PatternRule::name)
        .collect()
}

/// Name of the first rule matching `title`, or [`OTHER_LABEL`].
#[must_use]
pub fn classify_first<'r>(title: &str, rules: &'r [PatternRule]) -> &'r str {
    rules
        .iter()
        .find(|rule| rule.is_match(title))
        .map_or(OTHER_LABEL, PatternRule::name)
}

/// Tests `rule` once against a whole corpus rather than per title.
#[must_use]
pub fn corpus_matches(corpus: &str, rule: &PatternRule) -> bool {
    rule.is_match(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<PatternRule> {
        vec![
            PatternRule::keywords("Tutorial", &["how to"]).unwrap(),
            PatternRule::keywords("Review", &["review"]).unwrap(),
            PatternRule::regex("Question", r"\?").unwrap(),
        ]
    }

    #[test]
    fn match_all_returns_every_match_in_rule_order() {
        let rules = rules();
        assert_eq!(
            match_all("Review: how to pick a lens?", &rules),
            vec!["Tutorial", "Review", "Question"]
        );
    }

    #[test]
    fn match_all_empty_when_nothing_matches() {
        assert!(match_all("Weekend vlog", &rules()).is_empty());
    }

    #[test]
    fn classify_first_takes_earliest_rule() {
        let rules = rules();
        assert_eq!(classify_first("Review: how to pick a lens?", &rules), "Tutorial");
    }

    #[test]
    fn classify_first_falls_back_to_other() {
        assert_eq!(classify_first("Weekend vlog", &rules()), OTHER_LABEL);
    }

    #[test]
    fn classify_first_with_no_rules_is_other() {
        assert_eq!(classify_first("anything", &[]), OTHER_LABEL);
    }

    #[test]
    fn corpus_matches_tests_joined_titles() {
        let rule = PatternRule::keywords("Tier", &["tier list"]).unwrap();
        assert!(corpus_matches("Ranking every\ntier list ever", &rule));
        assert!(!corpus_matches("Ranking\nevery list", &rule));
    }
}
