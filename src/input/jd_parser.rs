//! Job-description parsing: the parser port the keyword engine consumes and a
//! heuristic default that classifies text shape and owns a bounded result cache.

use crate::error::Result;
use crate::input::text_extractor::strip_markup;
use crate::processing::keywords::CategorizedResult;
use crate::processing::structure::{is_bullet_line, Structure};
use log::debug;
use regex::Regex;
use std::collections::{HashMap, VecDeque};
use std::hash::Hasher;
use std::sync::LazyLock;
use twox_hash::XxHash64;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Named namespace inside a parser-owned cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheRegion(pub &'static str);

/// Region holding categorized keyword results.
pub const KEYWORD_CACHE: CacheRegion = CacheRegion("keywords");

const MIN_SECTION_HEADINGS: usize = 2;
const MIN_BULLET_LINES: usize = 3;
// Minimum share of bullet lines, in percent.
const BULLET_SHARE: usize = 40;
const MIN_SENTENCES: usize = 3;
const MAX_PHRASE_SEGMENT_WORDS: usize = 4;
const MAX_HEADING_WORDS: usize = 6;

const SECTION_HEADINGS: &[(&str, &[&str])] = &[
    (
        "skills",
        &["skills", "technical skills", "required skills", "key skills", "core competencies", "tech stack"],
    ),
    (
        "requirements",
        &["requirements", "minimum requirements", "what you need", "what you'll need", "must have", "must haves"],
    ),
    (
        "qualifications",
        &["qualifications", "preferred qualifications", "basic qualifications", "minimum qualifications", "nice to have"],
    ),
    (
        "responsibilities",
        &["responsibilities", "key responsibilities", "what you'll do", "what you will do", "duties", "the role"],
    ),
    (
        "about",
        &["about", "about us", "about the role", "about the company", "about you", "who we are"],
    ),
];

static PHRASE_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|/]").expect("Invalid delimiter regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?](?:\s|$)").expect("Invalid sentence regex"));
static SEGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|/\n]").expect("Invalid segment regex"));

/// Parser output: cleaned text, its classified shape and any named sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub text: String,
    pub structure: Structure,
    pub sections: HashMap<String, String>,
}

/// Document-structure collaborator for keyword extraction.
///
/// The cache is an opaque side channel: callers must get the same result
/// whether or not an entry was found.
pub trait DocumentParser: Send {
    /// Deterministic fingerprint of `raw_text`.
    fn cache_key(&self, raw_text: &str) -> String;

    fn get_cached(&self, key: &str, region: CacheRegion) -> Option<CategorizedResult>;

    fn set_cache(&mut self, key: &str, value: CategorizedResult, region: CacheRegion);

    fn process(&mut self, raw_text: &str) -> Result<ParsedDocument>;
}

/// Bounded map evicting its oldest key first.
#[derive(Debug)]
struct FifoCache<V> {
    entries: HashMap<String, V>,
    order: VecDeque<String>,
    capacity: usize,
}

impl<V: Clone> FifoCache<V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(existing) = self.entries.get_mut(key) {
            *existing = value;
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.to_string());
        self.entries.insert(key.to_string(), value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Default parser: strips markup, then classifies with line and punctuation
/// heuristics. Parsed documents and cached results are both FIFO bounded.
pub struct HeuristicParser {
    regions: HashMap<CacheRegion, FifoCache<CategorizedResult>>,
    parsed: FifoCache<ParsedDocument>,
    capacity: usize,
}

impl Default for HeuristicParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicParser {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Capacity is per region; 0 disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            regions: HashMap::new(),
            parsed: FifoCache::new(capacity),
            capacity,
        }
    }

    pub fn cached_entries(&self, region: CacheRegion) -> usize {
        self.regions.get(&region).map_or(0, FifoCache::len)
    }

    pub fn clear_cache(&mut self) {
        self.regions.clear();
        self.parsed.clear();
    }

    /// Classify already-cleaned text.
    pub fn classify(text: &str) -> (Structure, HashMap<String, String>) {
        let sections = split_sections(text);
        if sections.keys().filter(|name| *name != "other").count() >= MIN_SECTION_HEADINGS {
            return (Structure::Sections, sections);
        }

        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let bullets = lines.iter().filter(|l| is_bullet_line(l)).count();
        if lines.len() >= MIN_BULLET_LINES && bullets * 100 >= lines.len() * BULLET_SHARE {
            return (Structure::Bullets, HashMap::new());
        }

        let sentences = SENTENCE_END.find_iter(text).count();
        if looks_like_phrase_list(text, sentences) {
            return (Structure::Phrases, HashMap::new());
        }

        if sentences >= MIN_SENTENCES {
            return (Structure::Narrative, HashMap::new());
        }

        (Structure::Unstructured, HashMap::new())
    }
}

impl DocumentParser for HeuristicParser {
    fn cache_key(&self, raw_text: &str) -> String {
        let mut hasher = XxHash64::default();
        hasher.write(raw_text.as_bytes());
        format!("{:016x}", hasher.finish())
    }

    fn get_cached(&self, key: &str, region: CacheRegion) -> Option<CategorizedResult> {
        let hit = self.regions.get(&region).and_then(|cache| cache.get(key));
        if hit.is_some() {
            debug!("Cache hit in region '{}' for {}", region.0, key);
        }
        hit
    }

    fn set_cache(&mut self, key: &str, value: CategorizedResult, region: CacheRegion) {
        let capacity = self.capacity;
        self.regions
            .entry(region)
            .or_insert_with(|| FifoCache::new(capacity))
            .insert(key, value);
    }

    fn process(&mut self, raw_text: &str) -> Result<ParsedDocument> {
        let key = self.cache_key(raw_text);
        if let Some(parsed) = self.parsed.get(&key) {
            return Ok(parsed);
        }

        let text = strip_markup(raw_text);
        let (structure, sections) = Self::classify(&text);
        debug!(
            "Classified job description as {} ({} section(s))",
            structure,
            sections.len()
        );

        let parsed = ParsedDocument {
            text,
            structure,
            sections,
        };
        self.parsed.insert(&key, parsed.clone());
        Ok(parsed)
    }
}

/// Canonical section name when `line` reads as a known heading.
fn heading_name(line: &str) -> Option<&'static str> {
    let trimmed = line.trim();
    let ends_with_colon = trimmed.ends_with(':');
    let normalized = trimmed
        .trim_start_matches('#')
        .trim_matches(|c: char| c == '*' || c == ':' || c.is_whitespace())
        .to_lowercase();

    if normalized.is_empty() || normalized.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }

    SECTION_HEADINGS.iter().find_map(|(name, aliases)| {
        aliases
            .iter()
            .any(|alias| normalized == *alias || (ends_with_colon && normalized.starts_with(alias)))
            .then_some(*name)
    })
}

/// Group lines under the most recent known heading; text outside any known
/// heading lands in `other`.
fn split_sections(text: &str) -> HashMap<String, String> {
    let mut sections: HashMap<String, String> = HashMap::new();
    let mut current = "other";

    for line in text.lines() {
        if let Some(name) = heading_name(line) {
            current = name;
            sections.entry(current.to_string()).or_default();
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let body = sections.entry(current.to_string()).or_default();
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(line.trim());
    }

    sections.retain(|_, body| !body.is_empty());
    sections
}

fn looks_like_phrase_list(text: &str, sentences: usize) -> bool {
    let delimiters = PHRASE_DELIMITER.find_iter(text).count();
    if delimiters < 3 || delimiters < sentences * 3 {
        return false;
    }

    let segments: Vec<usize> = SEGMENT_SPLIT
        .split(text)
        .map(|s| s.split_whitespace().count())
        .filter(|&words| words > 0)
        .collect();
    if segments.is_empty() {
        return false;
    }
    segments.iter().sum::<usize>() <= segments.len() * MAX_PHRASE_SEGMENT_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_sections() {
        let text = "Acme is hiring.\nAbout us\nWe build tools.\nRequirements:\n- Python\n- AWS\nSkills\nRust, Go";
        let (structure, sections) = HeuristicParser::classify(text);
        assert_eq!(structure, Structure::Sections);
        assert_eq!(sections["requirements"], "- Python\n- AWS");
        assert_eq!(sections["skills"], "Rust, Go");
        assert_eq!(sections["about"], "We build tools.");
        assert_eq!(sections["other"], "Acme is hiring.");
    }

    #[test]
    fn test_single_heading_is_not_sections() {
        let (structure, _) = HeuristicParser::classify("Skills\n- Python\n- AWS\n- Docker");
        assert_eq!(structure, Structure::Bullets);
    }

    #[test]
    fn test_classifies_bullets_phrases_and_narrative() {
        let (structure, _) = HeuristicParser::classify("Role\n- Python\n- AWS\n1. Docker");
        assert_eq!(structure, Structure::Bullets);

        let (structure, _) = HeuristicParser::classify("SQL, Python, Tableau; Looker | dbt / Airflow");
        assert_eq!(structure, Structure::Phrases);

        let (structure, _) = HeuristicParser::classify(
            "We are growing fast. You will own our data platform. You know Kafka well. Apply today!",
        );
        assert_eq!(structure, Structure::Narrative);

        let (structure, _) = HeuristicParser::classify("kotlin android gradle");
        assert_eq!(structure, Structure::Unstructured);
    }

    #[test]
    fn test_heading_detection() {
        assert_eq!(heading_name("## Requirements"), Some("requirements"));
        assert_eq!(heading_name("**What you'll do:**"), Some("responsibilities"));
        assert_eq!(heading_name("Preferred qualifications for this role:"), Some("qualifications"));
        assert_eq!(heading_name("Skills in Python are a plus for this team"), None);
    }

    #[test]
    fn test_process_strips_markup() {
        let mut parser = HeuristicParser::new();
        let parsed = parser
            .process("<ul><li>Python</li><li>AWS</li><li>Kubernetes</li></ul>")
            .unwrap();
        assert_eq!(parsed.text, "- Python\n- AWS\n- Kubernetes");
        assert_eq!(parsed.structure, Structure::Bullets);
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let parser = HeuristicParser::new();
        let key = parser.cache_key("Senior Rust engineer");
        assert_eq!(key, parser.cache_key("Senior Rust engineer"));
        assert_ne!(key, parser.cache_key("Senior Go engineer"));
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn test_cache_regions_are_isolated() {
        let mut parser = HeuristicParser::new();
        let value = CategorizedResult::empty();
        parser.set_cache("k", value.clone(), KEYWORD_CACHE);

        assert_eq!(parser.get_cached("k", KEYWORD_CACHE), Some(value));
        assert_eq!(parser.get_cached("k", CacheRegion("matches")), None);
    }

    #[test]
    fn test_cache_evicts_oldest_first() {
        let mut parser = HeuristicParser::with_capacity(2);
        for key in ["a", "b", "c"] {
            parser.set_cache(key, CategorizedResult::empty(), KEYWORD_CACHE);
        }
        assert_eq!(parser.cached_entries(KEYWORD_CACHE), 2);
        assert!(parser.get_cached("a", KEYWORD_CACHE).is_none());
        assert!(parser.get_cached("c", KEYWORD_CACHE).is_some());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut parser = HeuristicParser::with_capacity(0);
        parser.set_cache("a", CategorizedResult::empty(), KEYWORD_CACHE);
        assert!(parser.get_cached("a", KEYWORD_CACHE).is_none());
    }
}
