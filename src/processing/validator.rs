//! Keyword admissibility and high-value classification

use crate::learning::store::LearnedKeywordStore;
use crate::processing::decluster::looks_clustered;
use crate::processing::keywords::normalize;
use crate::processing::lexicon::{
    is_blacklisted, is_dictionary_skill, is_library_phrase, matches_high_value_pattern,
};
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_KEYWORD_LEN: usize = 3;
pub const MAX_KEYWORD_LEN: usize = 30;

static KEYWORD_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+#.\s-]*[A-Za-z0-9]?$").expect("Invalid keyword shape regex")
});

/// Decide whether a single token or phrase is an admissible ATS keyword.
pub fn is_reliable_keyword(token: &str) -> bool {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return false;
    }

    let normalized = normalize(trimmed);
    let len = normalized.chars().count();
    if !(MIN_KEYWORD_LEN..=MAX_KEYWORD_LEN).contains(&len) {
        return false;
    }

    if !KEYWORD_SHAPE.is_match(trimmed) {
        return false;
    }

    if is_blacklisted(&normalized) {
        return false;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    !looks_clustered(trimmed)
}

/// True when the token matches a curated category pattern, the skill
/// dictionary, the phrase library or the learned store.
pub fn is_high_value_keyword(token: &str, learned: &LearnedKeywordStore) -> bool {
    let normalized = normalize(token);
    matches_high_value_pattern(&normalized)
        || is_dictionary_skill(&normalized)
        || is_library_phrase(&normalized)
        || learned.contains(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_boundaries() {
        assert!(!is_reliable_keyword("ab"));
        assert!(is_reliable_keyword("abc"));
        assert!(!is_reliable_keyword(&"a".repeat(31)));
        assert!(is_reliable_keyword(&"a".repeat(30)));
    }

    #[test]
    fn test_shape_and_blacklist() {
        assert!(!is_reliable_keyword("123"));
        assert!(is_reliable_keyword("c++"));
        assert!(is_reliable_keyword("node.js"));
        assert!(is_reliable_keyword("machine learning"));
        assert!(!is_reliable_keyword("the"));
        assert!(!is_reliable_keyword("Excellent"));
        assert!(!is_reliable_keyword("3d modeling"));
        assert!(!is_reliable_keyword("ci/cd"));
        assert!(!is_reliable_keyword(""));
        assert!(!is_reliable_keyword("   "));
    }

    #[test]
    fn test_clustered_tokens_rejected() {
        assert!(!is_reliable_keyword("salesforcecrmreporting"));
    }

    #[test]
    fn test_high_value_sources() {
        let mut learned = LearnedKeywordStore::in_memory();
        assert!(is_high_value_keyword("Python", &learned));
        assert!(is_high_value_keyword("reporting", &learned));
        assert!(is_high_value_keyword("Customer Success", &learned));
        assert!(!is_high_value_keyword("gardening", &learned));

        learned.insert("gardening");
        assert!(is_high_value_keyword("gardening", &learned));
    }
}
