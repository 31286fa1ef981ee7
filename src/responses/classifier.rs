//! Reply classifier built from ordered, anchored pattern rules.
//!
//! Rules run in priority order and the first match wins:
//! STOP, SKIP, DECLINE, CONFIRM, A, B, C, D. Matching is ASCII
//! case-insensitive against the whole input; nothing is trimmed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::ResponseOption;

/// Shared classifier with the standard vocabulary.
static DEFAULT_CLASSIFIER: LazyLock<ResponseClassifier> =
    LazyLock::new(ResponseClassifier::default_rules);

/// A single reply rule.
#[derive(Debug, Clone)]
pub struct ResponseRule {
    /// Option produced when the rule matches.
    pub option: ResponseOption,
    /// Compiled, anchored pattern.
    pub regex: Regex,
}

/// Maps reply text to a [`ResponseOption`].
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    rules: Vec<ResponseRule>,
}

impl ResponseClassifier {
    /// Build the classifier with the standard reply vocabulary.
    pub fn default_rules() -> Self {
        let rules = [
            (ResponseOption::Stop, r"(?i-u)^STOP$"),
            (ResponseOption::Skip, r"(?i-u)^SKIP$"),
            (ResponseOption::Decline, r"(?i-u)^DECLINE$"),
            (ResponseOption::Confirm, r"(?i-u)^CONFIRM$"),
            (ResponseOption::A, r"(?i-u)^A$"),
            (ResponseOption::B, r"(?i-u)^B$"),
            (ResponseOption::C, r"(?i-u)^C$"),
            (ResponseOption::D, r"(?i-u)^D$"),
        ]
        .into_iter()
        .map(|(option, pattern)| ResponseRule {
            option,
            regex: Regex::new(pattern).unwrap(),
        })
        .collect();

        Self { rules }
    }

    /// Classify a reply. Returns [`ResponseOption::Unknown`] when no rule matches.
    pub fn classify(&self, text: &str) -> ResponseOption {
        let option = self
            .rules
            .iter()
            .find(|rule| rule.regex.is_match(text))
            .map_or(ResponseOption::Unknown, |rule| rule.option);

        debug!(text, option = %option, "Classified reply");
        option
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[ResponseRule] {
        &self.rules
    }
}

/// Classify a reply with the standard vocabulary.
pub fn classify(text: &str) -> ResponseOption {
    DEFAULT_CLASSIFIER.classify(text)
}
