//! Configuration management for the job matcher

use crate::error::{JobMatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub ranking: RankingConfig,
    pub vectorizer: VectorizerConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub top_k: usize,
    pub min_score: f32,
    /// Number of leading postings the user is asked to rate
    pub feedback_prefix: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub max_features: Option<usize>,
    pub min_token_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Static,
    Adzuna,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub adzuna: AdzunaConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdzunaConfig {
    pub base_url: String,
    pub country: String,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    pub results_per_page: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub description_preview: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranking: RankingConfig {
                top_k: 10,
                min_score: 0.0,
                feedback_prefix: 3,
            },
            vectorizer: VectorizerConfig {
                ngram_min: 1,
                ngram_max: 1,
                max_features: None,
                min_token_len: 2,
            },
            source: SourceConfig {
                kind: SourceKind::Static,
                adzuna: AdzunaConfig {
                    base_url: "https://api.adzuna.com/v1/api/jobs".to_string(),
                    country: "ca".to_string(),
                    app_id: None,
                    app_key: None,
                    results_per_page: 50,
                    timeout_secs: 10,
                },
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                description_preview: 250,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| JobMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_k == 0 {
            return Err(JobMatcherError::Configuration("ranking.top_k must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.ranking.min_score) {
            return Err(JobMatcherError::Configuration(
                "ranking.min_score must be within [0, 1]".to_string(),
            ));
        }
        if self.vectorizer.ngram_min == 0 || self.vectorizer.ngram_min > self.vectorizer.ngram_max {
            return Err(JobMatcherError::Configuration(format!(
                "invalid n-gram range ({}, {})",
                self.vectorizer.ngram_min, self.vectorizer.ngram_max
            )));
        }
        Ok(())
    }

    /// Set a value by dotted key, e.g. `ranking.top_k`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value.parse().map_err(|_| {
                JobMatcherError::Configuration(format!("Invalid value '{}' for {}", value, key))
            })
        }
        fn optional(value: &str) -> Option<String> {
            match value.trim() {
                "" | "none" => None,
                v => Some(v.to_string()),
            }
        }

        match key {
            "ranking.top_k" => self.ranking.top_k = parse(key, value)?,
            "ranking.min_score" => self.ranking.min_score = parse(key, value)?,
            "ranking.feedback_prefix" => self.ranking.feedback_prefix = parse(key, value)?,
            "vectorizer.ngram_min" => self.vectorizer.ngram_min = parse(key, value)?,
            "vectorizer.ngram_max" => self.vectorizer.ngram_max = parse(key, value)?,
            "vectorizer.max_features" => {
                self.vectorizer.max_features = match optional(value) {
                    Some(v) => Some(parse(key, &v)?),
                    None => None,
                }
            }
            "vectorizer.min_token_len" => self.vectorizer.min_token_len = parse(key, value)?,
            "source.kind" => self.source.kind = parse_source_kind(value)?,
            "source.adzuna.base_url" => self.source.adzuna.base_url = value.to_string(),
            "source.adzuna.country" => self.source.adzuna.country = value.to_lowercase(),
            "source.adzuna.app_id" => self.source.adzuna.app_id = optional(value),
            "source.adzuna.app_key" => self.source.adzuna.app_key = optional(value),
            "source.adzuna.results_per_page" => {
                self.source.adzuna.results_per_page = parse(key, value)?
            }
            "source.adzuna.timeout_secs" => self.source.adzuna.timeout_secs = parse(key, value)?,
            "output.format" => self.output.format = parse_output_format(value)?,
            "output.color_output" => self.output.color_output = parse(key, value)?,
            "output.description_preview" => self.output.description_preview = parse(key, value)?,
            _ => {
                return Err(JobMatcherError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        self.validate()
    }

    /// Adzuna credentials, environment variables taking precedence over the file
    pub fn adzuna_credentials(&self) -> Option<(String, String)> {
        let app_id = std::env::var("ADZUNA_APP_ID")
            .ok()
            .or_else(|| self.source.adzuna.app_id.clone())?;
        let app_key = std::env::var("ADZUNA_APP_KEY")
            .ok()
            .or_else(|| self.source.adzuna.app_key.clone())?;
        Some((app_id, app_key))
    }
}

pub fn parse_source_kind(value: &str) -> Result<SourceKind> {
    match value.to_lowercase().as_str() {
        "static" | "catalog" => Ok(SourceKind::Static),
        "adzuna" => Ok(SourceKind::Adzuna),
        _ => Err(JobMatcherError::Configuration(format!(
            "Invalid job source: {}. Supported: static, adzuna",
            value
        ))),
    }
}

pub fn parse_output_format(value: &str) -> Result<OutputFormat> {
    match value.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(JobMatcherError::Configuration(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ranking.top_k = 5;
        config.source.kind = SourceKind::Adzuna;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_set_dotted_keys() {
        let mut config = Config::default();

        config.set("ranking.min_score", "0.25").unwrap();
        config.set("vectorizer.ngram_max", "2").unwrap();
        config.set("vectorizer.max_features", "1000").unwrap();
        config.set("output.format", "md").unwrap();
        config.set("source.adzuna.app_id", "abc").unwrap();

        assert_eq!(config.ranking.min_score, 0.25);
        assert_eq!(config.vectorizer.ngram_max, 2);
        assert_eq!(config.vectorizer.max_features, Some(1000));
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert_eq!(config.source.adzuna.app_id.as_deref(), Some("abc"));

        config.set("vectorizer.max_features", "none").unwrap();
        assert_eq!(config.vectorizer.max_features, None);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();

        assert!(config.set("ranking.top_k", "ten").is_err());
        assert!(config.set("ranking.top_k", "0").is_err());
        assert!(config.set("nope.key", "1").is_err());
        assert!(config.set("source.kind", "linkedin").is_err());
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ranking = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, JobMatcherError::Configuration(_)));
    }
}
