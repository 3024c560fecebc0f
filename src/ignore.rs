//! Suppression rules for warning messages.

use crate::error::Result;
use regex::Regex;

/// A rule that suppresses registration of matching messages.
#[derive(Clone, Debug)]
pub enum IgnorePattern {
    /// Case-sensitive substring match against the rendered message.
    Exact(String),
    /// Structural match via regular expression.
    Pattern(Regex),
}

impl IgnorePattern {
    pub fn exact(s: impl Into<String>) -> Self {
        IgnorePattern::Exact(s.into())
    }

    /// Compile a structural pattern. Fails on invalid regex syntax.
    pub fn pattern(re: &str) -> Result<Self> {
        Ok(IgnorePattern::Pattern(Regex::new(re)?))
    }

    fn matches(&self, message: &str) -> bool {
        match self {
            IgnorePattern::Exact(s) => message.contains(s.as_str()),
            IgnorePattern::Pattern(re) => re.is_match(message),
        }
    }
}

impl From<&str> for IgnorePattern {
    fn from(s: &str) -> Self {
        IgnorePattern::exact(s)
    }
}

impl From<String> for IgnorePattern {
    fn from(s: String) -> Self {
        IgnorePattern::Exact(s)
    }
}

/// The suppression configuration: an append-only set of ignore patterns.
///
/// Any one match suffices; pattern order is irrelevant. Additions are not
/// retroactive: categories already registered stay registered even if a new
/// pattern would match them.
#[derive(Debug, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patterns(&mut self, patterns: impl IntoIterator<Item = IgnorePattern>) {
        self.patterns.extend(patterns);
    }

    pub fn matches(&self, message: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(message))
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_semantics() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns([IgnorePattern::exact("Foo")]);

        assert!(matcher.matches("FooBar warning"));
        assert!(matcher.matches("prefix Foo suffix"));
        assert!(!matcher.matches("Bar warning"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns([IgnorePattern::exact("Foo")]);

        assert!(!matcher.matches("foo warning"));
    }

    #[test]
    fn test_regex_patterns() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns([IgnorePattern::pattern(r"deprecated in v\d+").unwrap()]);

        assert!(matcher.matches("API deprecated in v12, use the new one"));
        assert!(!matcher.matches("API deprecated in vNext"));
    }

    #[test]
    fn test_any_one_match_suffices() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns([IgnorePattern::exact("alpha"), IgnorePattern::exact("beta")]);

        assert!(matcher.matches("contains beta only"));
        assert_eq!(matcher.pattern_count(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(IgnorePattern::pattern("(unclosed").is_err());
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        let matcher = IgnoreMatcher::new();
        assert!(!matcher.matches("anything"));
        assert!(!matcher.matches(""));
    }
}
