//! Report structures for keyword extraction and resume matching

use crate::processing::ats_matcher::MatchResult;
use crate::processing::keywords::CategorizedResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    pub tool_version: String,

    /// Job description file analyzed
    pub job_file: String,

    /// Resume file scored, for match reports
    pub resume_file: Option<String>,

    pub processing_time_ms: u64,

    pub max_keywords: usize,
}

impl ReportMetadata {
    pub fn new(job_file: &str, resume_file: Option<&str>, processing_time_ms: u64, max_keywords: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            job_file: job_file.to_string(),
            resume_file: resume_file.map(str::to_string),
            processing_time_ms,
            max_keywords,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub metadata: ReportMetadata,
    pub keywords: CategorizedResult,
    /// Size of the learned store after extraction
    pub learned_keyword_count: usize,
}

/// Matched over total for one priority tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCoverage {
    pub matched: usize,
    pub total: usize,
}

impl TierCoverage {
    fn of(tier: &[String], result: &MatchResult) -> Self {
        Self {
            matched: tier.iter().filter(|k| result.matched.contains(k)).count(),
            total: tier.len(),
        }
    }

    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.matched as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub metadata: ReportMetadata,
    pub keywords: CategorizedResult,
    pub result: MatchResult,
    pub high_priority_coverage: TierCoverage,
    pub medium_priority_coverage: TierCoverage,
    pub low_priority_coverage: TierCoverage,
    /// High-priority keywords absent from the resume, in rank order
    pub critical_gaps: Vec<String>,
}

impl MatchReport {
    pub fn new(metadata: ReportMetadata, keywords: CategorizedResult, result: MatchResult) -> Self {
        let critical_gaps = keywords
            .high_priority
            .iter()
            .filter(|k| result.missing.contains(k))
            .cloned()
            .collect();

        Self {
            high_priority_coverage: TierCoverage::of(&keywords.high_priority, &result),
            medium_priority_coverage: TierCoverage::of(&keywords.medium_priority, &result),
            low_priority_coverage: TierCoverage::of(&keywords.low_priority, &result),
            critical_gaps,
            metadata,
            keywords,
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Extraction(ExtractionReport),
    Match(MatchReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ats_matcher::match_keywords;
    use crate::processing::keywords::categorize_keywords;

    #[test]
    fn test_match_report_coverage() {
        let keywords: Vec<String> = ["python", "kafka", "spark", "airflow", "snowflake"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let categorized = categorize_keywords(&keywords);
        let result = match_keywords("Python and Airflow pipelines", &categorized.all);

        let report = MatchReport::new(ReportMetadata::new("job.txt", Some("cv.txt"), 3, 35), categorized, result);

        // 5 keywords split 3 / 2 / 0
        assert_eq!(report.high_priority_coverage, TierCoverage { matched: 1, total: 3 });
        assert_eq!(report.medium_priority_coverage, TierCoverage { matched: 1, total: 2 });
        assert_eq!(report.low_priority_coverage.percentage(), 0);
        assert_eq!(report.critical_gaps, vec!["kafka", "spark"]);
    }
}
