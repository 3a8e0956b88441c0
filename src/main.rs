//! ats-keywords: structure-aware ATS keyword extraction and resume matching

use ats_keywords::cli::{self, Cli, Commands, ConfigAction, LearnedAction, SUPPORTED_EXTENSIONS};
use ats_keywords::config::{Config, OutputFormat};
use ats_keywords::error::{AtsError, Result};
use ats_keywords::input::InputManager;
use ats_keywords::output::formatter::{save_report_to_file, ReportGenerator};
use ats_keywords::output::report::{ExtractionReport, MatchReport, Report, ReportMetadata};
use ats_keywords::processing::{match_keywords, KeywordEngine};
use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if path.exists() => Config::load_from(path),
        Some(path) => {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
        None => Config::load(),
    }
}

fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => cli::parse_output_format(format).map_err(AtsError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn read_document(input: &mut InputManager, path: &Path, label: &str) -> Result<String> {
    cli::validate_file_extension(path, SUPPORTED_EXTENSIONS)
        .map_err(|e| AtsError::InvalidInput(format!("{} file: {}", label, e)))?;
    input.extract_text(path).await
}

fn emit(report: &Report, format: OutputFormat, config: &Config, save: Option<PathBuf>) -> Result<()> {
    // Files never carry terminal color codes.
    let use_colors = config.output.color_output && save.is_none();
    let rendered = ReportGenerator::with_options(use_colors, true, true).generate_report(report, &format)?;

    match save {
        Some(path) => {
            save_report_to_file(&rendered, &path)?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Extract { job, max, output, save } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let mut input = InputManager::new();
            let job_text = read_document(&mut input, &job, "Job description").await?;

            let mut engine = KeywordEngine::from_config(&config);
            let limit = max.unwrap_or(engine.max_keywords());

            let started = Instant::now();
            let keywords = engine.extract_reliable_keywords_with_limit(&job_text, limit);
            let elapsed = started.elapsed().as_millis() as u64;
            engine.flush_learned();

            let report = Report::Extraction(ExtractionReport {
                metadata: ReportMetadata::new(&job.to_string_lossy(), None, elapsed, limit),
                keywords,
                learned_keyword_count: engine.learned().len(),
            });
            emit(&report, format, &config, save)?;
        }

        Commands::Match { job, resume, max, output, save } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let mut input = InputManager::new();
            let job_text = read_document(&mut input, &job, "Job description").await?;
            let resume_text = read_document(&mut input, &resume, "Resume").await?;

            let mut engine = KeywordEngine::from_config(&config);
            let limit = max.unwrap_or(engine.max_keywords());

            let started = Instant::now();
            let keywords = engine.extract_reliable_keywords_with_limit(&job_text, limit);
            let result = match_keywords(&resume_text, &keywords.all);
            let elapsed = started.elapsed().as_millis() as u64;
            engine.flush_learned();

            info!(
                "Resume matched {} of {} keywords",
                result.match_count, result.total_keywords
            );

            let metadata = ReportMetadata::new(
                &job.to_string_lossy(),
                Some(&resume.to_string_lossy()),
                elapsed,
                limit,
            );
            let report = Report::Match(MatchReport::new(metadata, keywords, result));
            emit(&report, format, &config, save)?;
        }

        Commands::Learned { action } => {
            if !config.learning.enabled {
                println!("Keyword learning is disabled in the configuration.");
                return Ok(());
            }
            let mut engine = KeywordEngine::from_config(&config);

            match action {
                LearnedAction::List => {
                    let learned = engine.learned();
                    println!(
                        "Learned keywords ({}) in {}\n",
                        learned.len(),
                        config.learning.store_path.display()
                    );
                    for keyword in learned.iter() {
                        println!("  {}", keyword);
                    }
                }
                LearnedAction::Clear => {
                    let count = engine.learned().len();
                    engine.learned_mut().clear();
                    println!("Cleared {} learned keyword(s).", count);
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }

            Some(ConfigAction::Reset) => {
                match config_path {
                    Some(path) => Config::default().save_to(&path)?,
                    None => {
                        Config::reset()?;
                    }
                }
                println!("Configuration reset to defaults.");
            }
        },
    }

    Ok(())
}
