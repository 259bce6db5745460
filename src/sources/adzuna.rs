//! Adzuna job search API

use crate::config::Config;
use crate::error::{JobMatcherError, Result};
use crate::processing::document::{
    JobPosting, ATTR_CATEGORY, ATTR_EMPLOYMENT_TYPE, ATTR_LOCATION, ATTR_SALARY_RANGE,
};
use crate::sources::{FetchOutcome, JobQuery, JobSource};
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<AdzunaJob>,
}

#[derive(Debug, Deserialize)]
struct AdzunaJob {
    id: serde_json::Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    redirect_url: Option<String>,
    location: Option<AdzunaLocation>,
    company: Option<DisplayName>,
    category: Option<Label>,
    contract_time: Option<String>,
    contract_type: Option<String>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AdzunaLocation {
    #[serde(default)]
    area: Vec<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DisplayName {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Label {
    label: Option<String>,
}

impl AdzunaJob {
    fn into_posting(self) -> JobPosting {
        let id = match self.id {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        };
        let mut posting = JobPosting::new(id, self.title, self.description);

        if let Some(url) = self.redirect_url {
            posting = posting.with_url(url);
        }
        if let Some(name) = self.company.and_then(|c| c.display_name) {
            posting = posting.with_company(name);
        }
        if let Some(location) = self.location {
            for area in &location.area {
                posting = posting.with_attribute(ATTR_LOCATION, area.clone());
            }
            if let Some(display) = location.display_name {
                if !location.area.contains(&display) {
                    posting = posting.with_attribute(ATTR_LOCATION, display);
                }
            }
        }
        if let Some(label) = self.category.and_then(|c| c.label) {
            posting = posting.with_attribute(ATTR_CATEGORY, label);
        }
        for contract in [self.contract_time, self.contract_type].into_iter().flatten() {
            posting = posting.with_attribute(ATTR_EMPLOYMENT_TYPE, display_contract(&contract));
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            posting = posting.with_attribute(
                ATTR_SALARY_RANGE,
                format!("${:.0}k - ${:.0}k", min / 1000.0, max / 1000.0),
            );
        }
        posting
    }
}

/// `full_time` -> `Full-time`, matching the catalog's spelling
fn display_contract(value: &str) -> String {
    let spaced = value.replace('_', "-");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse an Adzuna search response body
pub fn parse_results(body: &str) -> Result<Vec<JobPosting>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.results.into_iter().map(AdzunaJob::into_posting).collect())
}

pub struct AdzunaSource {
    client: reqwest::Client,
    base_url: String,
    country: String,
    app_id: String,
    app_key: String,
    results_per_page: u32,
}

impl AdzunaSource {
    pub fn new(
        base_url: impl Into<String>,
        country: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        results_per_page: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JobMatcherError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country: country.into(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            results_per_page,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (app_id, app_key) = config.adzuna_credentials().ok_or_else(|| {
            JobMatcherError::Configuration(
                "Adzuna credentials missing: set ADZUNA_APP_ID and ADZUNA_APP_KEY or source.adzuna.app_id/app_key"
                    .to_string(),
            )
        })?;
        let adzuna = &config.source.adzuna;

        Self::new(
            adzuna.base_url.clone(),
            adzuna.country.clone(),
            app_id,
            app_key,
            adzuna.results_per_page,
            Duration::from_secs(adzuna.timeout_secs),
        )
    }

    fn search_url(&self) -> String {
        format!("{}/{}/search/1", self.base_url, self.country)
    }

    fn query_params(&self, query: &JobQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("app_id", self.app_id.clone()),
            ("app_key", self.app_key.clone()),
            ("results_per_page", self.results_per_page.to_string()),
            ("what", query.keywords.clone()),
            ("content-type", "application/json".to_string()),
        ];

        if let Some(location) = &query.location {
            params.push(("where", location.clone()));
        }
        if let Some(min) = query.min_salary {
            params.push(("salary_min", min.to_string()));
        }
        if let Some(max) = query.max_salary {
            params.push(("salary_max", max.to_string()));
        }
        if let Some(kind) = &query.employment_type {
            let flag = match kind.to_lowercase().replace(['-', ' '], "_").as_str() {
                "full_time" => Some("full_time"),
                "part_time" => Some("part_time"),
                "contract" => Some("contract"),
                "permanent" => Some("permanent"),
                _ => None,
            };
            if let Some(flag) = flag {
                params.push((flag, "1".to_string()));
            }
        }
        params
    }
}

impl JobSource for AdzunaSource {
    fn name(&self) -> &'static str {
        "adzuna"
    }

    async fn fetch(&self, query: &JobQuery) -> FetchOutcome {
        let url = self.search_url();
        debug!("Querying Adzuna at {}", url);

        let response = match self.client.get(&url).query(&self.query_params(query)).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::failed(format!("Job search request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::failed(format!("Job search returned HTTP {}", status));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::failed(format!("Failed to read job search response: {}", e)),
        };

        match parse_results(&body) {
            Ok(postings) => {
                info!("Fetched {} postings from Adzuna", postings.len());
                FetchOutcome::postings(postings)
            }
            Err(e) => FetchOutcome::failed(format!("Malformed job search response: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "count": 2,
        "results": [
            {
                "id": "4212931290",
                "title": "Machine Learning Engineer",
                "description": "Build ML pipelines in Python.",
                "redirect_url": "https://www.adzuna.ca/details/4212931290",
                "location": {"area": ["Canada", "Alberta", "Calgary"], "display_name": "Calgary, Alberta"},
                "company": {"display_name": "Prairie AI"},
                "category": {"label": "IT Jobs"},
                "contract_time": "full_time",
                "salary_min": 90000,
                "salary_max": 120000
            },
            {
                "id": 77,
                "title": "Line Cook",
                "description": "Kitchen prep."
            }
        ]
    }"#;

    #[test]
    fn test_parse_results() {
        let postings = parse_results(SAMPLE).unwrap();
        assert_eq!(postings.len(), 2);

        let ml = &postings[0];
        assert_eq!(ml.id, "4212931290");
        assert_eq!(ml.company.as_deref(), Some("Prairie AI"));
        assert_eq!(ml.attribute(ATTR_LOCATION), ["Canada", "Alberta", "Calgary", "Calgary, Alberta"]);
        assert_eq!(ml.primary_attribute(ATTR_EMPLOYMENT_TYPE), Some("Full-time"));
        assert_eq!(ml.primary_attribute(ATTR_SALARY_RANGE), Some("$90k - $120k"));
        assert_eq!(ml.primary_attribute(ATTR_CATEGORY), Some("IT Jobs"));

        assert_eq!(postings[1].id, "77");
        assert!(postings[1].attributes.is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        assert!(parse_results("{\"results\": 5}").is_err());
        assert!(parse_results("<html>").is_err());
    }

    #[test]
    fn test_query_params() {
        let source = AdzunaSource::new("http://localhost/", "ca", "id", "key", 50, Duration::from_secs(1)).unwrap();
        let params = source.query_params(&JobQuery {
            keywords: "AI".to_string(),
            location: Some("Calgary".to_string()),
            min_salary: Some(0),
            max_salary: None,
            employment_type: Some("Full-time".to_string()),
        });

        assert_eq!(source.search_url(), "http://localhost/ca/search/1");
        assert!(params.contains(&("what", "AI".to_string())));
        assert!(params.contains(&("where", "Calgary".to_string())));
        assert!(params.contains(&("salary_min", "0".to_string())));
        assert!(params.contains(&("full_time", "1".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "salary_max"));
    }

    #[tokio::test]
    async fn test_unreachable_api_degrades_to_empty() {
        let source = AdzunaSource::new("http://127.0.0.1:9", "ca", "id", "key", 50, Duration::from_secs(2)).unwrap();
        let outcome = source.fetch(&JobQuery::default()).await;

        assert!(outcome.postings.is_empty());
        assert!(outcome.warning.is_some());
    }
}
