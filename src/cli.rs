//! CLI interface for the ATS keyword tool

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::path::PathBuf;

/// Extensions accepted for job descriptions and resumes.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "html", "htm", "pdf"];

#[derive(Parser)]
#[command(name = "ats-keywords")]
#[command(about = "Extract ATS keywords from job descriptions and score resumes against them")]
#[command(long_about = "Structure-aware ATS keyword extraction with de-clustering, runtime keyword learning and whole-word resume matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract categorized keywords from a job description
    Extract {
        /// Path to job description file (TXT, MD, HTML, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Maximum number of keywords to keep
        #[arg(short, long)]
        max: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Score a resume against the keywords of a job description
    Match {
        /// Path to job description file (TXT, MD, HTML, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Path to resume file (TXT, MD, HTML, PDF)
        #[arg(short, long)]
        resume: PathBuf,

        /// Maximum number of keywords to extract from the job description
        #[arg(short, long)]
        max: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Inspect or reset the learned keyword store
    Learned {
        #[command(subcommand)]
        action: LearnedAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum LearnedAction {
    /// List learned keywords in the order they were learned
    List,

    /// Forget every learned keyword
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract_command() {
        let cli = Cli::try_parse_from(["ats-keywords", "extract", "--job", "jd.html", "--max", "20", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Extract { job, max, output, save } => {
                assert_eq!(job, PathBuf::from("jd.html"));
                assert_eq!(max, Some(20));
                assert!(output.is_none());
                assert!(save.is_none());
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("job.HTML"), SUPPORTED_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("job.docx"), SUPPORTED_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("job"), SUPPORTED_EXTENSIONS).is_err());
    }
}
