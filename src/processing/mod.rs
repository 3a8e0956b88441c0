//! Keyword extraction, ranking and matching

pub mod ats_matcher;
pub mod decluster;
pub mod engine;
pub mod keywords;
pub mod lexicon;
pub mod phrases;
pub mod structure;
pub mod technical;
pub mod validator;

pub use ats_matcher::{match_keywords, ATSMatcher, MatchResult};
pub use decluster::{decluster, decluster_text, looks_clustered};
pub use engine::KeywordEngine;
pub use keywords::{categorize_keywords, CategorizedResult, KeywordSet};
pub use phrases::extract_known_phrases;
pub use structure::{
    extract_bullets, extract_by_structure, extract_narrative, extract_phrases, extract_sections,
    frequency_fallback, Structure,
};
pub use technical::extract_technical_terms;
pub use validator::{is_high_value_keyword, is_reliable_keyword};
