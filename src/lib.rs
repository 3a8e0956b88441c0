//! ATS keyword extraction library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod learning;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{AtsError, Result};
pub use learning::{FlushPolicy, LearnedKeywordStore};
pub use processing::{CategorizedResult, KeywordEngine, MatchResult};
