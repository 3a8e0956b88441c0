//! Keyword value types: the insertion-ordered keyword set and the
//! priority-tiered result built from it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const HIGH_PRIORITY_CAP: usize = 15;
const MEDIUM_PRIORITY_CAP: usize = 10;
// Tier shares in percent.
const HIGH_PRIORITY_SHARE: usize = 45;
const MEDIUM_PRIORITY_SHARE: usize = 35;

fn ceil_percent(total: usize, percent: usize) -> usize {
    (total * percent).div_ceil(100)
}

/// Normalized form used for keyword identity.
pub fn normalize(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Insertion-ordered collection of unique keywords.
///
/// Entries are stored in normalized form; inserting a string that normalizes
/// to an existing entry is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyword, returning false when it was empty or already present.
    pub fn insert(&mut self, keyword: &str) -> bool {
        let normalized = normalize(keyword);
        if normalized.is_empty() || self.seen.contains(&normalized) {
            return false;
        }
        self.seen.insert(normalized.clone());
        self.items.push(normalized);
        true
    }

    pub fn extend_from<'a, I>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for keyword in keywords {
            self.insert(keyword);
        }
    }

    /// Append every entry of `other` not already present, keeping its order.
    pub fn merge(&mut self, other: &KeywordSet) {
        self.extend_from(other.iter());
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.seen.contains(&normalize(keyword))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn truncate(&mut self, len: usize) {
        if len >= self.items.len() {
            return;
        }
        for dropped in self.items.drain(len..) {
            self.seen.remove(&dropped);
        }
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        let seen = &mut self.seen;
        self.items.retain(|item| {
            let kept = keep(item.as_str());
            if !kept {
                seen.remove(item);
            }
            kept
        });
    }

    /// Stable sort: high-value entries first, then longer entries first.
    pub fn sort_by_priority<F>(&mut self, is_high_value: F)
    where
        F: Fn(&str) -> bool,
    {
        let mut keyed: Vec<(bool, usize, String)> = self
            .items
            .drain(..)
            .map(|item| (is_high_value(item.as_str()), item.chars().count(), item))
            .collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        self.items = keyed.into_iter().map(|(_, _, item)| item).collect();
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<'a> FromIterator<&'a str> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        set.extend_from(iter);
        set
    }
}

impl FromIterator<String> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(&keyword);
        }
        set
    }
}

/// Keywords partitioned into priority tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedResult {
    pub all: Vec<String>,
    pub high_priority: Vec<String>,
    pub medium_priority: Vec<String>,
    pub low_priority: Vec<String>,
    pub total: usize,
}

impl CategorizedResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Partition a ranked keyword list into high, medium and low priority tiers.
///
/// The high tier takes `min(15, ceil(0.45 * n))` entries, the medium tier the
/// next `min(10, ceil(0.35 * n))`, and the low tier whatever remains.
pub fn categorize_keywords(keywords: &[String]) -> CategorizedResult {
    let total = keywords.len();
    let high_count = HIGH_PRIORITY_CAP
        .min(ceil_percent(total, HIGH_PRIORITY_SHARE))
        .min(total);
    let medium_end =
        (high_count + MEDIUM_PRIORITY_CAP.min(ceil_percent(total, MEDIUM_PRIORITY_SHARE))).min(total);

    CategorizedResult {
        all: keywords.to_vec(),
        high_priority: keywords[..high_count].to_vec(),
        medium_priority: keywords[high_count..medium_end].to_vec(),
        low_priority: keywords[medium_end..].to_vec(),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("keyword{}", i)).collect()
    }

    #[test]
    fn test_set_dedups_by_normalized_form() {
        let mut set = KeywordSet::new();
        assert!(set.insert("Python"));
        assert!(!set.insert("  python "));
        assert!(set.insert("AWS"));
        assert!(!set.insert(""));
        assert_eq!(set.as_slice(), &["python".to_string(), "aws".to_string()]);
    }

    #[test]
    fn test_truncate_and_retain_keep_index_consistent() {
        let mut set: KeywordSet = ["a1", "b2", "c3", "d4"].into_iter().collect();
        set.truncate(2);
        assert!(!set.contains("c3"));
        assert!(set.insert("c3"));

        set.retain(|k| k != "a1");
        assert!(!set.contains("a1"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sort_by_priority_is_stable() {
        let mut set: KeywordSet = ["zz", "python", "yy", "kubernetes", "xx"].into_iter().collect();
        set.sort_by_priority(|k| k == "python" || k == "kubernetes");
        assert_eq!(
            set.into_vec(),
            vec!["kubernetes", "python", "zz", "yy", "xx"]
        );
    }

    #[test]
    fn test_categorize_partition() {
        for n in [0, 1, 2, 3, 7, 20, 35, 60] {
            let list = words(n);
            let result = categorize_keywords(&list);
            assert_eq!(result.total, n);
            assert_eq!(
                result.high_priority.len() + result.medium_priority.len() + result.low_priority.len(),
                n
            );
            let rebuilt: Vec<String> = result
                .high_priority
                .iter()
                .chain(&result.medium_priority)
                .chain(&result.low_priority)
                .cloned()
                .collect();
            assert_eq!(rebuilt, list);
        }
    }

    #[test]
    fn test_categorize_tier_sizes() {
        let result = categorize_keywords(&words(20));
        assert_eq!(result.high_priority.len(), 9);
        assert_eq!(result.medium_priority.len(), 7);
        assert_eq!(result.low_priority.len(), 4);

        let result = categorize_keywords(&words(35));
        assert_eq!(result.high_priority.len(), 15);
        assert_eq!(result.medium_priority.len(), 10);
        assert_eq!(result.low_priority.len(), 10);

        let result = categorize_keywords(&words(1));
        assert_eq!(result.high_priority.len(), 1);
        assert!(result.medium_priority.is_empty());
    }
}
