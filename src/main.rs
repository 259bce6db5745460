//! job-matcher: rank job postings against a resume

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use job_matcher::cli::{self, Cli, Commands, ConfigAction};
use job_matcher::config::{self, Config};
use job_matcher::error::{JobMatcherError, Result};
use job_matcher::input::manager::InputManager;
use job_matcher::output::formatter::{save_report_to_file, ReportGenerator};
use job_matcher::output::report::{MatchReport, ReportMetadata};
use job_matcher::processing::document::{JobPosting, ATTR_CATEGORY, ATTR_EMPLOYMENT_TYPE, ATTR_LOCATION};
use job_matcher::processing::engine::{RankOptions, RankingEngine};
use job_matcher::processing::feedback::{Feedback, FeedbackCoverage};
use job_matcher::processing::ranker::{FilterValues, Filters};
use job_matcher::sources::catalog::StaticCatalog;
use job_matcher::sources::{ConfiguredSource, JobQuery, JobSource};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            text,
            keywords,
            source,
            location,
            job_type,
            category,
            min_salary,
            max_salary,
            min_score,
            top_k,
            feedback,
            output,
            save,
        } => {
            let started = Instant::now();
            let mut warnings = Vec::new();

            let output_format = match output {
                Some(format) => config::parse_output_format(&format)?,
                None => config.output.format,
            };
            let source_kind = match source {
                Some(kind) => config::parse_source_kind(&kind)?,
                None => config.source.kind,
            };

            let (query_text, query_source) = match (resume, text, &keywords) {
                (Some(path), _, _) => {
                    cli::validate_file_extension(&path, &["pdf", "txt", "md"])
                        .map_err(|e| JobMatcherError::InvalidInput(format!("Resume file: {}", e)))?;
                    let extraction = InputManager::new().extract(&path).await?;
                    warnings.extend(extraction.warning);
                    (extraction.text, path.display().to_string())
                }
                (None, Some(text), _) => (text, "pasted text".to_string()),
                (None, None, Some(keywords)) => (keywords.clone(), "keywords".to_string()),
                (None, None, None) => {
                    return Err(JobMatcherError::invalid(
                        "Provide a resume file, resume text or keywords",
                    ))
                }
            };
            info!("Query from {}: {} characters", query_source, query_text.len());

            let job_source = ConfiguredSource::from_config(&config, source_kind)?;
            let query = JobQuery {
                keywords: keywords.unwrap_or_default(),
                location: single_value(&location),
                min_salary,
                max_salary,
                employment_type: single_value(&job_type),
            };

            let bar = spinner(&format!("Fetching postings from {}...", job_source.name()));
            let outcome = job_source.fetch(&query).await;
            bar.finish_and_clear();
            warnings.extend(outcome.warning);
            let postings = outcome.postings;
            info!("Fetched {} postings from {}", postings.len(), job_source.name());

            let mut filters = Filters::new();
            filters.insert(ATTR_LOCATION, FilterValues::from_values(location));
            filters.insert(ATTR_EMPLOYMENT_TYPE, FilterValues::from_values(job_type));
            filters.insert(ATTR_CATEGORY, FilterValues::from_values(category));

            let mut options = RankOptions::default()
                .with_top_k(top_k.unwrap_or(config.ranking.top_k))
                .with_min_score(min_score.unwrap_or(config.ranking.min_score))
                .with_filters(filters);

            if let Some(ratings) = feedback {
                let mut ratings = cli::parse_ratings(&ratings).map_err(JobMatcherError::InvalidInput)?;
                let limit = config.ranking.feedback_prefix.min(postings.len());
                if ratings.len() > limit {
                    let message = format!("Only the first {} ratings were applied", limit);
                    warn!("{}", message);
                    warnings.push(message);
                    ratings.truncate(limit);
                }
                if !ratings.is_empty() {
                    options = options.with_feedback(Feedback::from_ratings(&ratings, FeedbackCoverage::Prefix)?);
                }
            }

            let engine = RankingEngine::from_config(&config);
            let result = engine.rank(&query_text, &postings, &options)?;

            let mut metadata = ReportMetadata::new(query_source, job_source.name());
            metadata.postings_considered = postings.len();
            metadata.feedback_applied = options.feedback.is_some();
            metadata.processing_time_ms = started.elapsed().as_millis() as u64;
            metadata.warnings = warnings;

            let report = MatchReport::new(result, metadata);
            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                config.output.description_preview,
            );
            let content = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&content, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Jobs { location, job_type } => {
            let catalog = StaticCatalog::new();
            let filters = Filters::new()
                .with(ATTR_LOCATION, location)
                .with(ATTR_EMPLOYMENT_TYPE, job_type);
            let postings: Vec<JobPosting> = filters.apply(catalog.postings()).into_iter().cloned().collect();

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                config.output.description_preview,
            );
            println!("{}", generator.console().format_listing(&postings));
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    JobMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("Configuration ({})\n", config_path.display());
                println!("{}", content);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset to defaults");
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut config = config;
                config.set(&key, &value)?;
                config.save_to(&config_path)?;
                println!("Set {} = {}", key, value);
            }
        },
    }

    Ok(())
}

/// The one concrete value a source can search on, if exactly one was given
fn single_value(values: &[String]) -> Option<String> {
    match FilterValues::from_values(values.iter().cloned()) {
        FilterValues::OneOf(set) if set.len() == 1 => values
            .iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
