//! Output formatters for extraction and match reports

use crate::config::OutputFormat;
use crate::error::{AtsError, Result};
use crate::output::report::*;
use colored::{Color, Colorize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// Widest keyword cell in console tables, in graphemes.
const KEYWORD_CELL_WIDTH: usize = 28;

/// Trait for formatting reports
pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for documentation and reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

/// Cut `text` to at most `max` graphemes, marking the cut with an ellipsis.
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    format!("{}…", graphemes[..keep].concat())
}

fn file_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn score_label(score: u32) -> (&'static str, Color) {
    match score {
        80..=100 => ("STRONG", Color::Green),
        60..=79 => ("GOOD", Color::Yellow),
        40..=59 => ("FAIR", Color::BrightYellow),
        _ => ("WEAK", Color::Red),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u32) -> String {
        let (badge, color) = score_label(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_metadata(&self, metadata: &ReportMetadata) -> String {
        let mut output = format!(
            "Generated: {} | Processing time: {}ms\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time_ms
        );
        output.push_str(&format!("Job description: {}\n", file_label(&metadata.job_file)));
        if let Some(resume) = &metadata.resume_file {
            output.push_str(&format!("Resume: {}\n", file_label(resume)));
        }
        output
    }

    fn format_tier(&self, title: &str, keywords: &[String], color: Color) -> String {
        let mut output = self.format_header(&format!("{} ({})", title, keywords.len()), 3);
        if keywords.is_empty() {
            output.push_str("  (none)\n");
            return output;
        }
        for (i, keyword) in keywords.iter().enumerate() {
            let cell = truncate_graphemes(keyword, KEYWORD_CELL_WIDTH);
            output.push_str(&format!("  {:>2}. {}\n", i + 1, self.colorize(&cell, color)));
        }
        output
    }

    fn format_extraction(&self, report: &ExtractionReport) -> String {
        let mut output = self.format_header("ATS KEYWORD EXTRACTION", 1);
        output.push_str(&self.format_metadata(&report.metadata));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Keywords: {} (limit {})\nLearned keywords on file: {}\n",
            report.keywords.total, report.metadata.max_keywords, report.learned_keyword_count
        ));

        output.push_str(&self.format_tier("High priority", &report.keywords.high_priority, Color::Green));
        output.push_str(&self.format_tier("Medium priority", &report.keywords.medium_priority, Color::Cyan));
        output.push_str(&self.format_tier("Low priority", &report.keywords.low_priority, Color::White));
        output
    }

    fn format_coverage(&self, label: &str, coverage: &TierCoverage) -> String {
        format!(
            "  {:<16} {}/{} ({}%)\n",
            label,
            coverage.matched,
            coverage.total,
            coverage.percentage()
        )
    }

    fn format_match(&self, report: &MatchReport) -> String {
        let mut output = self.format_header("ATS KEYWORD MATCH", 1);
        output.push_str(&self.format_metadata(&report.metadata));

        output.push_str(&self.format_header("Match Score", 2));
        output.push_str(&format!(
            "Score: {}% {} ({} of {} keywords found)\n",
            report.result.match_score,
            self.format_score_badge(report.result.match_score),
            report.result.match_count,
            report.result.total_keywords
        ));

        output.push_str(&self.format_header("Coverage by priority", 3));
        output.push_str(&self.format_coverage("High", &report.high_priority_coverage));
        output.push_str(&self.format_coverage("Medium", &report.medium_priority_coverage));
        output.push_str(&self.format_coverage("Low", &report.low_priority_coverage));

        if !report.critical_gaps.is_empty() {
            output.push_str(&self.format_header("Critical gaps", 3));
            for keyword in &report.critical_gaps {
                let cell = truncate_graphemes(keyword, KEYWORD_CELL_WIDTH);
                output.push_str(&format!("  ✗ {}\n", self.colorize(&cell, Color::Red)));
            }
        }

        output.push_str(&self.format_tier("Found in resume", &report.result.matched, Color::Green));
        output.push_str(&self.format_tier("Missing from resume", &report.result.missing, Color::Red));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        Ok(match report {
            Report::Extraction(extraction) => self.format_extraction(extraction),
            Report::Match(matched) => self.format_match(matched),
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn metadata_block(&self, metadata: &ReportMetadata) -> String {
        if !self.include_metadata {
            return String::new();
        }
        let mut output = format!(
            "**Generated:** {} | **Processing Time:** {}ms\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time_ms
        );
        output.push_str(&format!("**Job:** `{}`", file_label(&metadata.job_file)));
        if let Some(resume) = &metadata.resume_file {
            output.push_str(&format!(" | **Resume:** `{}`", file_label(resume)));
        }
        output.push_str("\n\n");
        output
    }

    fn keyword_list(title: &str, keywords: &[String]) -> String {
        let mut output = format!("### {} ({})\n\n", title, keywords.len());
        if keywords.is_empty() {
            output.push_str("_None_\n\n");
            return output;
        }
        for keyword in keywords {
            output.push_str(&format!("- `{}`\n", keyword));
        }
        output.push('\n');
        output
    }

    fn format_extraction(&self, report: &ExtractionReport) -> String {
        let mut output = String::from("# ATS Keyword Extraction\n\n");
        output.push_str(&self.metadata_block(&report.metadata));
        output.push_str(&format!(
            "**Keywords:** {} of at most {}\n\n",
            report.keywords.total, report.metadata.max_keywords
        ));
        output.push_str(&Self::keyword_list("High Priority", &report.keywords.high_priority));
        output.push_str(&Self::keyword_list("Medium Priority", &report.keywords.medium_priority));
        output.push_str(&Self::keyword_list("Low Priority", &report.keywords.low_priority));
        output
    }

    fn format_match(&self, report: &MatchReport) -> String {
        let (label, _) = score_label(report.result.match_score);
        let mut output = String::from("# ATS Keyword Match\n\n");
        output.push_str(&self.metadata_block(&report.metadata));
        output.push_str(&format!(
            "**Match Score:** {}% ({}) with {} of {} keywords found\n\n",
            report.result.match_score, label, report.result.match_count, report.result.total_keywords
        ));

        output.push_str("| Priority | Found | Total | Coverage |\n");
        output.push_str("|----------|-------|-------|----------|\n");
        for (tier, coverage) in [
            ("High", &report.high_priority_coverage),
            ("Medium", &report.medium_priority_coverage),
            ("Low", &report.low_priority_coverage),
        ] {
            output.push_str(&format!(
                "| {} | {} | {} | {}% |\n",
                tier,
                coverage.matched,
                coverage.total,
                coverage.percentage()
            ));
        }
        output.push('\n');

        if !report.critical_gaps.is_empty() {
            output.push_str(&Self::keyword_list("Critical Gaps", &report.critical_gaps));
        }
        output.push_str(&Self::keyword_list("Found", &report.result.matched));
        output.push_str(&Self::keyword_list("Missing", &report.result.missing));
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        Ok(match report {
            Report::Extraction(extraction) => self.format_extraction(extraction),
            Report::Match(matched) => self.format_match(matched),
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &Report, format: &OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        AtsError::OutputFormatting(format!("Failed to write report to {}: {}", file_path.display(), e))
    })
}

pub fn suggest_filename(format: &OutputFormat, job_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(job_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_keywords{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_keywords{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_keywords{}.md", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ats_matcher::match_keywords;
    use crate::processing::keywords::categorize_keywords;

    fn extraction_report() -> Report {
        let keywords: Vec<String> = ["python", "aws", "terraform"].iter().map(|s| s.to_string()).collect();
        Report::Extraction(ExtractionReport {
            metadata: ReportMetadata::new("/tmp/jobs/backend.txt", None, 4, 35),
            keywords: categorize_keywords(&keywords),
            learned_keyword_count: 2,
        })
    }

    fn match_report() -> Report {
        let keywords: Vec<String> = ["python", "aws", "terraform"].iter().map(|s| s.to_string()).collect();
        let categorized = categorize_keywords(&keywords);
        let result = match_keywords("Python on AWS", &categorized.all);
        Report::Match(MatchReport::new(
            ReportMetadata::new("backend.txt", Some("cv.md"), 4, 35),
            categorized,
            result,
        ))
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("python", 10), "python");
        assert_eq!(truncate_graphemes("customer success manager", 10), "customer …");
        assert_eq!(truncate_graphemes("cafe\u{301} crème", 5), "cafe\u{301}…");
    }

    #[test]
    fn test_console_without_colors() {
        let formatter = ConsoleFormatter::new(false);
        let output = formatter.format_report(&extraction_report()).unwrap();
        assert!(output.contains("ATS KEYWORD EXTRACTION"));
        assert!(output.contains("Job description: backend.txt"));
        assert!(output.contains("High priority (2)"));
        assert!(output.contains(" 1. python"));

        let output = formatter.format_report(&match_report()).unwrap();
        assert!(output.contains("Score: 67% [GOOD] (2 of 3 keywords found)"));
        assert!(output.contains("Missing from resume (1)"));
    }

    #[test]
    fn test_json_is_tagged() {
        let json = JsonFormatter::new(false).format_report(&match_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"], "match");
        assert_eq!(value["result"]["matchScore"], 67);
        assert_eq!(value["keywords"]["highPriority"][0], "python");
    }

    #[test]
    fn test_markdown_match_table() {
        let output = MarkdownFormatter::new(true).format_report(&match_report()).unwrap();
        assert!(output.starts_with("# ATS Keyword Match"));
        assert!(output.contains("**Job:** `backend.txt` | **Resume:** `cv.md`"));
        assert!(output.contains("| High | 2 | 2 | 100% |"));
        assert!(output.contains("| Medium | 0 | 1 | 0% |"));
        assert!(output.contains("- `terraform`"));
    }

    #[test]
    fn test_generator_routes_by_format() {
        let generator = ReportGenerator::with_options(false, true, false);
        let report = extraction_report();
        let markdown = generator.generate_report(&report, &OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with("# ATS Keyword Extraction"));
        assert!(!markdown.contains("**Generated:**"));
        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.contains("\"learned_keyword_count\": 2"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Json, "jobs/backend.html", false), "backend_keywords.json");
    }
}
