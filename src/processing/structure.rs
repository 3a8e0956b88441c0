//! Structure-aware extraction strategies and the dispatcher that picks one
//! from the parser's structure classification.

use crate::learning::store::LearnedKeywordStore;
use crate::processing::keywords::KeywordSet;
use crate::processing::phrases::extract_known_phrases;
use crate::processing::technical::extract_technical_terms;
use crate::processing::validator::{is_high_value_keyword, is_reliable_keyword};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Upper bound on keywords returned by one structure dispatch.
pub const MAX_STRUCTURE_KEYWORDS: usize = 35;
/// Per-section cap for secondary sections.
pub const SECONDARY_SECTION_CAP: usize = 10;

pub const PRIORITY_SECTIONS: [&str; 3] = ["skills", "requirements", "qualifications"];
pub const SECONDARY_SECTIONS: [&str; 3] = ["responsibilities", "about", "other"];

static BULLET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-•●○◦▪▸►]|\d+[.)])\s*\S").expect("Invalid bullet line regex")
});

static BULLET_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-•●○◦▪▸►]|\d+[.)])\s*").expect("Invalid bullet marker regex")
});

static CONTEXT_CUES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:experience|expertise|proficiency|knowledge|skills?)\s+(?:in|with|of|using)\s+([^,.;]+)",
        r"(?i)\b(?:working|work)\s+with\s+([^,.;]+)",
        r"(?i)\b(?:using|use)\s+([^,.;]+)",
        r"(?i)\b(?:including|such\s+as|like)\s+([^,.;]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid context cue regex"))
    .collect()
});

static PHRASE_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|/\n]+").expect("Invalid delimiter regex"));

/// Shape of the source text as classified by the document parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    Bullets,
    Sections,
    Narrative,
    Phrases,
    /// Anything else, including a missing tag. Routed to frequency fallback.
    Unstructured,
}

impl Structure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Structure::Bullets => "bullets",
            Structure::Sections => "sections",
            Structure::Narrative => "narrative",
            Structure::Phrases => "phrases",
            Structure::Unstructured => "raw_text",
        }
    }
}

impl From<&str> for Structure {
    fn from(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "bullets" => Structure::Bullets,
            "sections" => Structure::Sections,
            "narrative" => Structure::Narrative,
            "phrases" => Structure::Phrases,
            _ => Structure::Unstructured,
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn is_bullet_line(line: &str) -> bool {
    BULLET_LINE.is_match(line)
}

/// Run technical extraction on every bullet or numbered line.
pub fn extract_bullets(text: &str, learned: &mut LearnedKeywordStore) -> KeywordSet {
    let mut keywords = KeywordSet::new();
    for line in text.lines().filter(|line| is_bullet_line(line)) {
        let content = BULLET_MARKER.replace(line, "");
        keywords.merge(&extract_technical_terms(content.trim(), learned));
    }
    keywords
}

/// Full extraction for priority sections, capped extraction for secondary ones.
pub fn extract_sections(
    sections: &HashMap<String, String>,
    learned: &mut LearnedKeywordStore,
) -> KeywordSet {
    let mut keywords = KeywordSet::new();

    for key in PRIORITY_SECTIONS {
        if let Some(content) = sections.get(key) {
            keywords.merge(&extract_technical_terms(content, learned));
        }
    }

    for key in SECONDARY_SECTIONS {
        if let Some(content) = sections.get(key) {
            let section_keywords = extract_technical_terms(content, learned);
            keywords.extend_from(section_keywords.iter().take(SECONDARY_SECTION_CAP));
        }
    }

    keywords
}

/// Extract from clauses introduced by context cues, then from the whole text.
pub fn extract_narrative(text: &str, learned: &mut LearnedKeywordStore) -> KeywordSet {
    let mut keywords = KeywordSet::new();

    for cue in CONTEXT_CUES.iter() {
        let clauses: Vec<String> = cue
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect();
        for clause in clauses {
            keywords.merge(&extract_technical_terms(&clause, learned));
        }
    }

    keywords.merge(&extract_technical_terms(text, learned));
    keywords
}

/// Treat delimiter-separated tokens as already atomic and validate them directly.
pub fn extract_phrases(text: &str) -> KeywordSet {
    PHRASE_DELIMITERS
        .split(text)
        .flat_map(str::split_whitespace)
        .filter(|token| is_reliable_keyword(token))
        .collect()
}

/// Frequency-ranked validated tokens; ties keep first-seen order.
pub fn frequency_fallback(text: &str) -> KeywordSet {
    let lower = text.to_lowercase();
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for word in lower.split_whitespace() {
        let clean: String = word
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '+' | '#'))
            .collect();
        if !is_reliable_keyword(&clean) {
            continue;
        }
        let count = counts.entry(clean.clone()).or_insert(0);
        if *count == 0 {
            order.push(clean);
        }
        *count += 1;
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().collect()
}

/// Dispatch on `structure`, merge directly detected known phrases in front,
/// rank high-value and longer keywords first and cap the result.
pub fn extract_by_structure(
    text: &str,
    structure: &Structure,
    sections: &HashMap<String, String>,
    learned: &mut LearnedKeywordStore,
) -> KeywordSet {
    let branch = match structure {
        Structure::Bullets => extract_bullets(text, learned),
        Structure::Sections => extract_sections(sections, learned),
        Structure::Narrative => extract_narrative(text, learned),
        Structure::Phrases => extract_phrases(text),
        Structure::Unstructured => frequency_fallback(text),
    };
    debug!("{} extraction produced {} keyword(s)", structure, branch.len());

    let mut keywords = extract_known_phrases(text, learned);
    keywords.merge(&branch);

    let learned: &LearnedKeywordStore = learned;
    keywords.sort_by_priority(|k| is_high_value_keyword(k, learned));
    keywords.truncate(MAX_STRUCTURE_KEYWORDS);
    keywords
}
