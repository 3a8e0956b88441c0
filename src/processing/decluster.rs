//! De-clustering of tokens produced when markup stripping glues adjacent
//! words together (e.g. `salesforcecrmreporting`).

use crate::processing::keywords::KeywordSet;
use crate::processing::lexicon::{is_blacklisted, LONG_SKILL_MATCHER, SKILLS_LONGEST_FIRST};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Shortest token that can be flagged as clustered.
const CLUSTER_MIN_LEN: usize = 15;
/// Shortest token `decluster` will try to split.
const DECLUSTER_MIN_LEN: usize = 10;
const MIN_FRAGMENT_LEN: usize = 3;

static DOTTED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{4,}\.[A-Za-z]{4,}").expect("Invalid dotted-run regex"));

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]{3,}[A-Z][a-z]{3,}").expect("Invalid camel-case regex"));

/// Number of distinct dictionary skills (4+ chars) found inside `token`.
fn distinct_skill_hits(token: &str) -> usize {
    let (matcher, _) = &*LONG_SKILL_MATCHER;
    let hits: HashSet<usize> = matcher
        .find_overlapping_iter(token)
        .map(|m| m.pattern().as_usize())
        .collect();
    hits.len()
}

/// Heuristic detector for several words merged without separators.
pub fn looks_clustered(token: &str) -> bool {
    if token.chars().count() < CLUSTER_MIN_LEN {
        return false;
    }

    distinct_skill_hits(token) >= 2 || DOTTED_RUN.is_match(token) || CAMEL_BOUNDARY.is_match(token)
}

/// Split a merged token back into known skills plus leftover fragments.
///
/// Skills are consumed greedily, longest dictionary entry first, each at its
/// first occurrence. Returns `[token]` when nothing could be extracted.
pub fn decluster(token: &str) -> Vec<String> {
    if token.chars().count() < DECLUSTER_MIN_LEN {
        return vec![token.to_string()];
    }

    let mut remaining = token.to_lowercase().replace(['.', ','], " ");
    let mut extracted = KeywordSet::new();

    for skill in SKILLS_LONGEST_FIRST.iter() {
        if let Some(pos) = remaining.find(skill) {
            extracted.insert(skill);
            remaining.replace_range(pos..pos + skill.len(), " ");
        }
    }

    for fragment in remaining.split_whitespace() {
        if fragment.chars().count() >= MIN_FRAGMENT_LEN && !is_blacklisted(fragment) {
            extracted.insert(fragment);
        }
    }

    if extracted.is_empty() {
        vec![token.to_string()]
    } else {
        extracted.into_vec()
    }
}

/// Replace every clustered token in `text` by its de-clustered expansion.
///
/// Whitespace inside a line collapses to single spaces; line breaks are kept.
pub fn decluster_text(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.split_whitespace()
                .map(|token| {
                    if looks_clustered(token) {
                        decluster(token).join(" ")
                    } else {
                        token.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustered_dictionary_run() {
        let token = "salesforcecrmreporting";
        assert!(looks_clustered(token));

        let parts = decluster(token);
        assert!(parts.contains(&"salesforce".to_string()));
        assert!(parts.contains(&"crm".to_string()));
        assert!(parts.contains(&"reporting".to_string()));
    }

    #[test]
    fn test_dotted_and_camel_case_runs() {
        assert!(looks_clustered("experience.Strongly"));
        assert!(looks_clustered("responsibilitiesInclude"));
        assert!(!looks_clustered("JavaScript"));
        assert!(!looks_clustered("node.js"));
    }

    #[test]
    fn test_short_or_clean_tokens_are_not_clustered() {
        assert!(!looks_clustered("kubernetes"));
        assert!(!looks_clustered("troubleshooting"));
        assert!(!looks_clustered("salesforce"));
    }

    #[test]
    fn test_decluster_keeps_leftover_fragments() {
        let parts = decluster("pythonwarehousing");
        assert_eq!(parts[0], "python");
        assert!(parts.contains(&"warehousing".to_string()));
    }

    #[test]
    fn test_decluster_short_token_unchanged() {
        assert_eq!(decluster("python"), vec!["python".to_string()]);
    }

    #[test]
    fn test_decluster_text_idempotent_on_clean_text() {
        let text = "Senior engineer with Python and AWS.\n- Kubernetes, Terraform";
        assert_eq!(decluster_text(text), text);
        assert_eq!(decluster_text(&decluster_text(text)), text);
    }

    #[test]
    fn test_decluster_text_collapses_whitespace_within_lines() {
        assert_eq!(decluster_text("python   aws\n  sql"), "python aws\nsql");
    }

    #[test]
    fn test_decluster_text_expands_clustered_tokens() {
        let out = decluster_text("Tools: salesforcecrmreporting daily");
        assert_eq!(out, "Tools: salesforce reporting crm daily");
    }
}
