//! CLI interface for the job matcher

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "job-matcher")]
#[command(about = "Rank job postings against a resume")]
#[command(long_about = "Match a resume, pasted text or keywords against job postings using TF-IDF similarity, filters and feedback ratings")]
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
    /// Rank job postings against a resume
    Match {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "text")]
        resume: Option<PathBuf>,

        /// Resume text pasted directly
        #[arg(short, long)]
        text: Option<String>,

        /// Search keywords; used as the query when no resume is given
        #[arg(short, long)]
        keywords: Option<String>,

        /// Job source: static, adzuna
        #[arg(long)]
        source: Option<String>,

        /// Locations to keep ("All" for any)
        #[arg(long, value_delimiter = ',')]
        location: Vec<String>,

        /// Employment types to keep ("All" for any)
        #[arg(long = "job-type", value_delimiter = ',')]
        job_type: Vec<String>,

        /// Categories to keep ("All" for any)
        #[arg(long, value_delimiter = ',')]
        category: Vec<String>,

        /// Minimum annual salary
        #[arg(long)]
        min_salary: Option<u32>,

        /// Maximum annual salary
        #[arg(long)]
        max_salary: Option<u32>,

        /// Minimum match score in [0, 1]
        #[arg(long)]
        min_score: Option<f32>,

        /// Number of matches to return
        #[arg(long)]
        top_k: Option<usize>,

        /// Ratings for the first postings, e.g. "5,1,1"
        #[arg(short, long)]
        feedback: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Browse the bundled job catalog
    Jobs {
        /// Locations to keep ("All" for any)
        #[arg(long, value_delimiter = ',')]
        location: Vec<String>,

        /// Employment types to keep ("All" for any)
        #[arg(long = "job-type", value_delimiter = ',')]
        job_type: Vec<String>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "ranking.top_k")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse a comma separated rating list such as "5,1,1"
pub fn parse_ratings(input: &str) -> Result<Vec<f32>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f32>()
                .map_err(|_| format!("Invalid rating '{}': expected a number", s))
        })
        .collect()
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
