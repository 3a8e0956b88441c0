//! Known-phrase detection against the static library and the learned store

use crate::learning::store::LearnedKeywordStore;
use crate::processing::keywords::KeywordSet;
use crate::processing::lexicon::PHRASES_LONGEST_FIRST;

/// Find library phrases (longest first) and learned keywords occurring as
/// literal substrings of the lowercased text.
pub fn extract_known_phrases(text: &str, learned: &LearnedKeywordStore) -> KeywordSet {
    let lower = text.to_lowercase();
    let mut found = KeywordSet::new();

    for phrase in PHRASES_LONGEST_FIRST.iter() {
        if lower.contains(phrase) {
            found.insert(phrase);
        }
    }

    for keyword in learned.iter() {
        if lower.contains(keyword) {
            found.insert(keyword);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_phrase_ranks_first() {
        let learned = LearnedKeywordStore::in_memory();
        let found = extract_known_phrases(
            "We need a Customer Success Manager with account management chops",
            &learned,
        );
        let list = found.into_vec();
        assert_eq!(list[0], "customer success manager");
        assert!(list.contains(&"customer success".to_string()));
        assert!(list.contains(&"account management".to_string()));
    }

    #[test]
    fn test_learned_matches_follow_library_matches() {
        let mut learned = LearnedKeywordStore::in_memory();
        learned.insert("looker studio");
        learned.insert("machine learning");

        let found = extract_known_phrases("Machine learning dashboards in Looker Studio", &learned);
        assert_eq!(found.into_vec(), vec!["machine learning", "looker studio"]);
    }

    #[test]
    fn test_no_matches() {
        let learned = LearnedKeywordStore::in_memory();
        assert!(extract_known_phrases("nothing relevant here", &learned).is_empty());
    }
}
