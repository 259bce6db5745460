//! Job posting sources
//!
//! Sources sit outside the ranking core. A failing source never returns an
//! error: it hands back an empty posting list and a warning for the caller.

pub mod adzuna;
pub mod catalog;

use crate::config::{Config, SourceKind};
use crate::error::Result;
use crate::processing::document::JobPosting;
use adzuna::AdzunaSource;
use catalog::StaticCatalog;
use std::future::Future;

/// Search criteria passed to a source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobQuery {
    pub keywords: String,
    pub location: Option<String>,
    pub min_salary: Option<u32>,
    pub max_salary: Option<u32>,
    pub employment_type: Option<String>,
}

/// Postings returned by a source, with a warning when the source degraded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub postings: Vec<JobPosting>,
    pub warning: Option<String>,
}

impl FetchOutcome {
    pub fn postings(postings: Vec<JobPosting>) -> Self {
        Self {
            postings,
            warning: None,
        }
    }

    pub fn failed(warning: impl Into<String>) -> Self {
        let warning = warning.into();
        log::warn!("{}", warning);
        Self {
            postings: Vec::new(),
            warning: Some(warning),
        }
    }
}

pub trait JobSource {
    fn name(&self) -> &'static str;

    fn fetch(&self, query: &JobQuery) -> impl Future<Output = FetchOutcome> + Send;
}

/// The source selected by configuration
pub enum ConfiguredSource {
    Static(StaticCatalog),
    Adzuna(AdzunaSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &Config, kind: SourceKind) -> Result<Self> {
        match kind {
            SourceKind::Static => Ok(ConfiguredSource::Static(StaticCatalog::new())),
            SourceKind::Adzuna => Ok(ConfiguredSource::Adzuna(AdzunaSource::from_config(config)?)),
        }
    }
}

impl JobSource for ConfiguredSource {
    fn name(&self) -> &'static str {
        match self {
            ConfiguredSource::Static(source) => source.name(),
            ConfiguredSource::Adzuna(source) => source.name(),
        }
    }

    async fn fetch(&self, query: &JobQuery) -> FetchOutcome {
        match self {
            ConfiguredSource::Static(source) => source.fetch(query).await,
            ConfiguredSource::Adzuna(source) => source.fetch(query).await,
        }
    }
}
