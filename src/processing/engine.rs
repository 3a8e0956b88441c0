//! Top-level keyword extraction: parse, de-cluster, dispatch on structure,
//! filter, cap and categorize, with the parser's cache consulted around it.

use crate::config::Config;
use crate::input::jd_parser::{DocumentParser, HeuristicParser, ParsedDocument, KEYWORD_CACHE};
use crate::input::text_extractor::strip_markup;
use crate::learning::persistence::{JsonFileStore, MemoryStore};
use crate::learning::store::{FlushPolicy, LearnedKeywordStore};
use crate::processing::decluster::{decluster_text, looks_clustered};
use crate::processing::keywords::{categorize_keywords, CategorizedResult, KeywordSet};
use crate::processing::phrases;
use crate::processing::structure::{self, frequency_fallback, Structure, MAX_STRUCTURE_KEYWORDS};
use crate::processing::technical;
use crate::processing::validator;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Version suffix appended to cache fingerprints; bump when output changes shape.
pub const CACHE_VERSION_SUFFIX: &str = "_keywords_v2";

/// Keyword extraction engine owning the learned store and an optional parser.
pub struct KeywordEngine {
    learned: LearnedKeywordStore,
    parser: Option<Box<dyn DocumentParser>>,
    max_keywords: usize,
}

impl KeywordEngine {
    /// Engine without a parser; input is markup-stripped and treated as raw text.
    pub fn new(learned: LearnedKeywordStore) -> Self {
        Self {
            learned,
            parser: None,
            max_keywords: MAX_STRUCTURE_KEYWORDS,
        }
    }

    pub fn with_parser(mut self, parser: Box<dyn DocumentParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// Build an engine wired the way the config asks: file-backed learning
    /// (or a throwaway memory store) and a heuristic parser.
    pub fn from_config(config: &Config) -> Self {
        let learning = &config.learning;
        let learned = if learning.enabled {
            info!("Using learned keyword store at {}", learning.store_path.display());
            LearnedKeywordStore::load(
                Box::new(JsonFileStore::new(&learning.store_path)),
                learning.flush_policy.clone(),
                learning.max_entries,
            )
        } else {
            LearnedKeywordStore::load(Box::new(MemoryStore::new()), FlushPolicy::Never, learning.max_entries)
        };

        let capacity = if config.cache.enabled { config.cache.capacity } else { 0 };

        Self::new(learned)
            .with_parser(Box::new(HeuristicParser::with_capacity(capacity)))
            .with_max_keywords(config.extraction.max_keywords)
    }

    pub fn max_keywords(&self) -> usize {
        self.max_keywords
    }

    pub fn learned(&self) -> &LearnedKeywordStore {
        &self.learned
    }

    pub fn learned_mut(&mut self) -> &mut LearnedKeywordStore {
        &mut self.learned
    }

    /// Extract and categorize up to the configured number of keywords.
    pub fn extract_reliable_keywords(&mut self, raw_text: &str) -> CategorizedResult {
        self.extract_reliable_keywords_with_limit(raw_text, self.max_keywords)
    }

    pub fn extract_reliable_keywords_with_limit(
        &mut self,
        raw_text: &str,
        max_keywords: usize,
    ) -> CategorizedResult {
        if raw_text.trim().is_empty() {
            return CategorizedResult::empty();
        }

        // The limit is part of the key so differently capped results never collide.
        let cache_key = self
            .parser
            .as_ref()
            .map(|parser| format!("{}_{}{}", parser.cache_key(raw_text), max_keywords, CACHE_VERSION_SUFFIX));

        if let (Some(parser), Some(key)) = (self.parser.as_ref(), cache_key.as_deref()) {
            if let Some(cached) = parser.get_cached(key, KEYWORD_CACHE) {
                return cached;
            }
        }

        let parsed = self.parse(raw_text);
        let text = decluster_text(&parsed.text);

        let mut keywords =
            structure::extract_by_structure(&text, &parsed.structure, &parsed.sections, &mut self.learned);
        if keywords.is_empty() {
            debug!("Structure extraction found nothing, using frequency fallback");
            keywords = frequency_fallback(&text);
        }

        keywords.retain(|keyword| !looks_clustered(keyword));
        keywords.truncate(max_keywords);

        let result = categorize_keywords(keywords.as_slice());
        info!(
            "Extracted {} keyword(s) from {} text",
            result.total, parsed.structure
        );

        if let (Some(parser), Some(key)) = (self.parser.as_mut(), cache_key.as_deref()) {
            parser.set_cache(key, result.clone(), KEYWORD_CACHE);
        }

        result
    }

    fn parse(&mut self, raw_text: &str) -> ParsedDocument {
        if let Some(parser) = self.parser.as_mut() {
            match parser.process(raw_text) {
                Ok(parsed) => return parsed,
                Err(e) => warn!("Job description parser failed, treating input as raw text: {}", e),
            }
        }

        ParsedDocument {
            text: strip_markup(raw_text),
            structure: Structure::Unstructured,
            sections: HashMap::new(),
        }
    }

    pub fn extract_by_structure(
        &mut self,
        text: &str,
        shape: &Structure,
        sections: &HashMap<String, String>,
    ) -> KeywordSet {
        structure::extract_by_structure(text, shape, sections, &mut self.learned)
    }

    pub fn extract_technical_terms(&mut self, text: &str) -> KeywordSet {
        technical::extract_technical_terms(text, &mut self.learned)
    }

    pub fn extract_known_phrases(&self, text: &str) -> KeywordSet {
        phrases::extract_known_phrases(text, &self.learned)
    }

    pub fn is_high_value_keyword(&self, token: &str) -> bool {
        validator::is_high_value_keyword(token, &self.learned)
    }

    /// Persist anything learned so far regardless of the flush policy.
    pub fn flush_learned(&mut self) {
        self.learned.flush();
    }
}
