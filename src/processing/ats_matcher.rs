//! ATS keyword matching: whole-word, case-insensitive containment of each
//! keyword in a candidate document.

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// Rounded percentage of keywords found, 0 when there are no keywords.
    pub match_score: u32,
    pub match_count: usize,
    pub total_keywords: usize,
}

/// ATS matcher holding one compiled whole-word pattern per keyword
pub struct ATSMatcher {
    keywords: Vec<String>,
    patterns: Vec<Option<Regex>>,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive literal pattern for `keyword` bounded by word boundaries.
///
/// `\b` is asserted on an end whose keyword character is a word character.
/// A symbol end (`c++`, `c#`) instead must be followed by the end of input or
/// a character that cannot extend the keyword.
fn whole_word_pattern(keyword: &str) -> Option<Regex> {
    let trimmed = keyword.trim();
    let first = trimmed.chars().next()?;
    let last = trimmed.chars().last()?;

    let pattern = format!(
        "(?i){}{}{}",
        if is_word_char(first) { r"\b" } else { "" },
        regex::escape(trimmed),
        if is_word_char(last) { r"\b" } else { r"(?:$|[^\w+#])" },
    );

    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Could not build matcher for keyword '{}': {}", keyword, e);
            None
        }
    }
}

impl ATSMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_string()).collect();
        let patterns = keywords.iter().map(|k| whole_word_pattern(k)).collect();
        Self { keywords, patterns }
    }

    /// Score `document` against every keyword.
    pub fn score(&self, document: &str) -> MatchResult {
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for (keyword, pattern) in self.keywords.iter().zip(&self.patterns) {
            let found = pattern.as_ref().is_some_and(|p| p.is_match(document));
            if found {
                matched.push(keyword.clone());
            } else {
                missing.push(keyword.clone());
            }
        }

        let total_keywords = self.keywords.len();
        let match_score = if total_keywords == 0 {
            0
        } else {
            ((matched.len() as f64 / total_keywords as f64) * 100.0).round() as u32
        };

        MatchResult {
            match_count: matched.len(),
            matched,
            missing,
            match_score,
            total_keywords,
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

/// Score a document against a keyword list.
pub fn match_keywords<S: AsRef<str>>(document: &str, keywords: &[S]) -> MatchResult {
    ATSMatcher::new(keywords).score(document)
}
