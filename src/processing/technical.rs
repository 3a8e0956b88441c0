//! Technical-term extraction for a single unit of text.
//!
//! The pipeline only ever adds to an insertion-ordered set: known phrases,
//! then high-value pattern hits, then auxiliary phrase-pattern hits, then
//! validated single tokens. Every call also feeds the learned store.

use crate::learning::store::LearnedKeywordStore;
use crate::processing::decluster::decluster_text;
use crate::processing::keywords::KeywordSet;
use crate::processing::lexicon::{is_dictionary_skill, matches_high_value_pattern, HIGH_VALUE_PATTERNS};
use crate::processing::phrases::extract_known_phrases;
use crate::processing::validator::is_reliable_keyword;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

const MIN_LEARNABLE_LEN: usize = 4;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Multi-word technical phrase shapes.
///
/// NOTE: these run against the case-preserved text while the high-value
/// categories run against the lowercased text. Both matchers are
/// case-insensitive, so the split only affects what the token scanner sees.
static AUXILIARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // hyphenated/dotted compounds: node.js, ci-cd, scikit-learn
        r"(?i)\b[a-z]+[-.][a-z]+(?:[-.][a-z]+)*",
        r"(?i)\b(?:machine|deep)\s+learning\b",
        r"(?i)\b(?:data|software|web|cloud|security|devops|platform|solutions?|sales|full[-\s]?stack|front[-\s]?end|back[-\s]?end)\s+(?:engineer|developer|architect|analyst|scientist)\b",
        r"(?i)\b(?:project|product|program|account)\s+management\b",
        r"(?i)\b(?:customer|partner|client)\s+success\b",
        r"(?i)\bsecurity\s+awareness\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid auxiliary pattern"))
    .collect()
});

/// Strip everything outside `[A-Za-z0-9-+#.]` and trim edge dots/hyphens.
fn clean_token(token: &str) -> String {
    let kept: String = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '#' | '.'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '-').to_string()
}

/// Extract technical keywords from `text` and learn from the result.
pub fn extract_technical_terms(text: &str, learned: &mut LearnedKeywordStore) -> KeywordSet {
    let mut keywords = KeywordSet::new();
    if text.trim().is_empty() {
        return keywords;
    }

    let declustered = decluster_text(text);
    let lower = declustered.to_lowercase();
    // Keywords whose source spelling started with an uppercase letter.
    let mut capitalized: Vec<String> = Vec::new();

    keywords.merge(&extract_known_phrases(&lower, learned));

    for category in HIGH_VALUE_PATTERNS.iter() {
        for m in category.regex.find_iter(&lower) {
            keywords.insert(m.as_str());
        }
    }

    for pattern in AUXILIARY_PATTERNS.iter() {
        for m in pattern.find_iter(&declustered) {
            let phrase = WHITESPACE.replace_all(m.as_str(), " ").to_lowercase();
            if is_reliable_keyword(&phrase) {
                if m.as_str().starts_with(|c: char| c.is_uppercase()) {
                    capitalized.push(phrase.clone());
                }
                keywords.insert(&phrase);
            }
        }
    }

    for token in declustered.split_whitespace() {
        let clean = clean_token(token);
        if is_reliable_keyword(&clean) {
            if clean.starts_with(|c: char| c.is_ascii_uppercase()) {
                capitalized.push(clean.to_lowercase());
            }
            keywords.insert(&clean);
        }
    }

    learn_from(&keywords, &capitalized, learned);
    learned.record_extraction();

    keywords
}

fn learn_from(keywords: &KeywordSet, capitalized: &[String], learned: &mut LearnedKeywordStore) {
    let mut added = 0;
    for keyword in keywords.iter() {
        if keyword.chars().count() < MIN_LEARNABLE_LEN {
            continue;
        }
        let learnable = is_dictionary_skill(keyword)
            || matches_high_value_pattern(keyword)
            || capitalized.iter().any(|c| c == keyword);
        if learnable && learned.insert(keyword) {
            added += 1;
        }
    }
    if added > 0 {
        debug!("Learned {} new keyword(s)", added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        let mut learned = LearnedKeywordStore::in_memory();
        let terms = extract_technical_terms(
            "Machine learning engineer using Python, Node.js and Kubernetes",
            &mut learned,
        )
        .into_vec();

        // phrase library hit first, then category pattern hits
        assert_eq!(terms[0], "machine learning");
        assert_eq!(terms[1], "python");
        assert!(terms.contains(&"node.js".to_string()));
        assert!(terms.contains(&"kubernetes".to_string()));
        assert!(!terms.contains(&"using".to_string()));
        assert!(!terms.contains(&"and".to_string()));
    }

    #[test]
    fn test_single_tokens_are_cleaned() {
        let mut learned = LearnedKeywordStore::in_memory();
        let terms = extract_technical_terms("(Snowflake), dbt; Looker.", &mut learned);
        assert!(terms.contains("snowflake"));
        assert!(terms.contains("dbt"));
        assert!(terms.contains("looker"));
        assert!(!terms.contains("looker."));
    }

    #[test]
    fn test_declusters_before_extraction() {
        let mut learned = LearnedKeywordStore::in_memory();
        let terms = extract_technical_terms("salesforcecrmreporting", &mut learned);
        assert!(terms.contains("salesforce"));
        assert!(terms.contains("crm"));
        assert!(terms.contains("reporting"));
        assert!(!terms.contains("salesforcecrmreporting"));
    }

    #[test]
    fn test_auxiliary_patterns_need_validation() {
        let mut learned = LearnedKeywordStore::in_memory();
        let terms = extract_technical_terms("Senior Data   Engineer and product management", &mut learned);
        assert!(terms.contains("data engineer"));
        assert!(terms.contains("product management"));
    }

    #[test]
    fn test_learning_side_effect() {
        let mut learned = LearnedKeywordStore::in_memory();
        extract_technical_terms("Experience with Snowflake and terraform, plus dbt and gardening", &mut learned);

        assert!(learned.contains("snowflake"));
        assert!(learned.contains("terraform"));
        // too short to learn
        assert!(!learned.contains("dbt"));
        // lowercase and not a known skill
        assert!(!learned.contains("gardening"));
    }

    #[test]
    fn test_capitalized_role_phrases_are_learned() {
        let mut learned = LearnedKeywordStore::in_memory();
        let terms = extract_technical_terms("Hiring a Software Engineer and a cloud architect", &mut learned);

        assert!(terms.contains("software engineer"));
        assert!(terms.contains("cloud architect"));
        assert!(learned.contains("software engineer"));
        // lowercase in the source text
        assert!(!learned.contains("cloud architect"));
    }

    #[test]
    fn test_deterministic_with_stable_learning() {
        let mut learned = LearnedKeywordStore::in_memory();
        let text = "We use Python, AWS Lambda and Salesforce for Customer Success reporting.";
        extract_technical_terms(text, &mut learned);

        let first = extract_technical_terms(text, &mut learned);
        let second = extract_technical_terms(text, &mut learned);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_text() {
        let mut learned = LearnedKeywordStore::in_memory();
        assert!(extract_technical_terms("   ", &mut learned).is_empty());
        assert!(learned.is_empty());
    }
}
