//! Input processing module
//! Handles file detection, text extraction, job-description parsing and input management

pub mod file_detector;
pub mod jd_parser;
pub mod manager;
pub mod text_extractor;

pub use jd_parser::{CacheRegion, DocumentParser, HeuristicParser, ParsedDocument, KEYWORD_CACHE};
pub use manager::InputManager;
pub use text_extractor::strip_markup;
