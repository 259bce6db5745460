//! Filtering, thresholding and top-K ordering of scored postings

use crate::error::{JobMatcherError, Result};
use crate::processing::document::JobPosting;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_TOP_K: usize = 10;

/// Sentinel accepted on the command line for "no filter"
pub const ALL_SENTINEL: &str = "All";

/// Allowed values for one filtered attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValues {
    Any,
    OneOf(BTreeSet<String>),
}

impl FilterValues {
    /// Build from user values; an empty list or one containing "All" means no filter.
    /// Values are compared ignoring case.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| {
                let v: String = v.into();
                v.trim().to_lowercase()
            })
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case(ALL_SENTINEL)) {
            FilterValues::Any
        } else {
            FilterValues::OneOf(values)
        }
    }

    pub fn accepts(&self, candidates: &[String]) -> bool {
        match self {
            FilterValues::Any => true,
            FilterValues::OneOf(allowed) => candidates
                .iter()
                .any(|c| allowed.contains(&c.trim().to_lowercase())),
        }
    }
}

/// Attribute name to allowed values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    fields: BTreeMap<String, FilterValues>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(field.into(), FilterValues::from_values(values));
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, values: FilterValues) {
        self.fields.insert(field.into(), values);
    }

    /// True when no field restricts anything
    pub fn is_unrestricted(&self) -> bool {
        self.fields.values().all(|v| matches!(v, FilterValues::Any))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FilterValues)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every restricted field must match at least one of the posting's values
    pub fn allows(&self, posting: &JobPosting) -> bool {
        self.fields
            .iter()
            .all(|(field, values)| values.accepts(posting.attribute(field)))
    }

    /// Postings that pass, in their original order
    pub fn apply<'a>(&self, postings: &'a [JobPosting]) -> Vec<&'a JobPosting> {
        postings.iter().filter(|p| self.allows(p)).collect()
    }
}

/// A posting with its scores for one ranking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub posting: JobPosting,
    /// Rescaled similarity in [0, 1]
    pub similarity: f32,
    /// Similarity after feedback weighting, when feedback was supplied
    pub feedback_score: Option<f32>,
    /// Position in the corpus handed to the ranker
    pub corpus_index: usize,
}

impl ScoredDocument {
    pub fn final_score(&self) -> f32 {
        self.feedback_score.unwrap_or(self.similarity)
    }

    pub fn match_percentage(&self) -> f32 {
        (self.final_score() * 10_000.0).round() / 100.0
    }
}

/// Ordered result, descending by final score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub documents: Vec<ScoredDocument>,
}

impl RankingResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredDocument> {
        self.documents.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.posting.id.as_str()).collect()
    }
}

/// Reject a zero `top_k` or a threshold outside [0, 1]
pub fn validate_options(min_score: f32, top_k: usize) -> Result<()> {
    if top_k == 0 {
        return Err(JobMatcherError::invalid("top_k must be at least 1"));
    }
    if !min_score.is_finite() || !(0.0..=1.0).contains(&min_score) {
        return Err(JobMatcherError::invalid(format!(
            "min_score {} is outside [0, 1]",
            min_score
        )));
    }
    Ok(())
}

/// Rank postings by their final scores
pub fn rank(
    documents: &[JobPosting],
    final_scores: &[f32],
    filters: &Filters,
    min_score: f32,
    top_k: usize,
) -> Result<RankingResult> {
    if documents.len() != final_scores.len() {
        return Err(JobMatcherError::invalid(format!(
            "{} documents but {} scores",
            documents.len(),
            final_scores.len()
        )));
    }

    let scored = documents
        .iter()
        .zip(final_scores)
        .enumerate()
        .map(|(i, (posting, &score))| ScoredDocument {
            posting: posting.clone(),
            similarity: score,
            feedback_score: None,
            corpus_index: i,
        })
        .collect();

    rank_scored(scored, filters, min_score, top_k)
}

/// Filter, threshold, stable sort and truncate already scored postings
pub fn rank_scored(
    scored: Vec<ScoredDocument>,
    filters: &Filters,
    min_score: f32,
    top_k: usize,
) -> Result<RankingResult> {
    validate_options(min_score, top_k)?;

    let total = scored.len();
    let mut survivors: Vec<ScoredDocument> = scored
        .into_iter()
        .filter(|doc| filters.allows(&doc.posting))
        .filter(|doc| doc.final_score() >= min_score)
        .collect();

    // sort_by is stable, equal scores keep corpus order
    survivors.sort_by(|a, b| b.final_score().total_cmp(&a.final_score()));
    survivors.truncate(top_k);

    log::debug!("Ranked {} of {} postings", survivors.len(), total);

    Ok(RankingResult {
        documents: survivors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::{ATTR_EMPLOYMENT_TYPE, ATTR_LOCATION};

    fn postings() -> Vec<JobPosting> {
        vec![
            JobPosting::new("0", "Data Scientist", "python")
                .with_attribute(ATTR_LOCATION, "Boston")
                .with_attribute(ATTR_EMPLOYMENT_TYPE, "Full-time"),
            JobPosting::new("1", "Frontend Developer", "react")
                .with_attribute(ATTR_LOCATION, "Austin")
                .with_attribute(ATTR_EMPLOYMENT_TYPE, "Contract"),
            JobPosting::new("2", "Backend Developer", "node")
                .with_attribute(ATTR_LOCATION, "Austin")
                .with_attribute(ATTR_EMPLOYMENT_TYPE, "Full-time"),
            JobPosting::new("3", "Technical Writer", "docs")
                .with_attribute(ATTR_LOCATION, "Remote"),
        ]
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let docs = postings();
        let result = rank(&docs, &[0.2, 0.9, 0.5, 0.7], &Filters::new(), 0.0, 2).unwrap();

        assert_eq!(result.ids(), vec!["1", "3"]);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let docs = postings();
        let result = rank(&docs, &[0.5, 0.1, 0.5, 0.1], &Filters::new(), 0.0, 10).unwrap();

        assert_eq!(result.ids(), vec!["0", "2", "1", "3"]);
    }

    #[test]
    fn test_filters_and_threshold() {
        let docs = postings();
        let filters = Filters::new()
            .with(ATTR_LOCATION, ["Austin", "Remote"])
            .with(ATTR_EMPLOYMENT_TYPE, ["All"]);
        let result = rank(&docs, &[1.0, 0.3, 0.6, 0.8], &filters, 0.5, 10).unwrap();

        assert_eq!(result.ids(), vec!["3", "2"]);
        assert!(result.iter().all(|d| d.final_score() >= 0.5));
    }

    #[test]
    fn test_missing_attribute_fails_filter() {
        let docs = postings();
        let filters = Filters::new().with(ATTR_EMPLOYMENT_TYPE, ["Full-time"]);
        let result = rank(&docs, &[0.1, 0.2, 0.3, 0.4], &filters, 0.0, 10).unwrap();

        assert_eq!(result.ids(), vec!["2", "0"]);
    }

    #[test]
    fn test_top_k_larger_than_set_and_empty_result() {
        let docs = postings();
        let all = rank(&docs, &[0.1, 0.2, 0.3, 0.4], &Filters::new(), 0.0, 50).unwrap();
        assert_eq!(all.len(), 4);

        let none = rank(&docs, &[0.1, 0.2, 0.3, 0.4], &Filters::new(), 0.95, 10).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_invalid_options() {
        let docs = postings();
        let scores = [0.1, 0.2, 0.3, 0.4];

        assert!(rank(&docs, &scores, &Filters::new(), 0.0, 0).unwrap_err().is_invalid_input());
        assert!(rank(&docs, &scores, &Filters::new(), 1.5, 5).unwrap_err().is_invalid_input());
        assert!(rank(&docs, &scores[..2], &Filters::new(), 0.0, 5).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_filter_values_ignore_case() {
        let docs = postings();
        let filters = Filters::new().with(ATTR_LOCATION, ["austin"]);
        let result = rank(&docs, &[0.1, 0.2, 0.3, 0.4], &filters, 0.0, 10).unwrap();

        assert_eq!(result.ids(), vec!["2", "1"]);
        assert!(FilterValues::from_values(["FULL-TIME"]).accepts(&["Full-time".to_string()]));
    }

    #[test]
    fn test_all_sentinel_disables_filter() {
        assert_eq!(FilterValues::from_values(["all", "Boston"]), FilterValues::Any);
        assert_eq!(FilterValues::from_values(Vec::<String>::new()), FilterValues::Any);
        assert!(Filters::new().with(ATTR_LOCATION, ["All"]).is_unrestricted());
        assert!(!Filters::new().with(ATTR_LOCATION, ["Boston"]).is_unrestricted());
    }

    #[test]
    fn test_match_percentage() {
        let doc = ScoredDocument {
            posting: JobPosting::new("x", "t", "b"),
            similarity: 0.87654,
            feedback_score: Some(0.5),
            corpus_index: 0,
        };
        assert_eq!(doc.final_score(), 0.5);
        assert_eq!(doc.match_percentage(), 50.0);
    }
}
