//! Ranking engine: normalize → vectorize → score → combine → rank

use crate::config::Config;
use crate::error::{JobMatcherError, Result};
use crate::processing::document::JobPosting;
use crate::processing::feedback::{combine, Feedback};
use crate::processing::index::CorpusIndex;
use crate::processing::normalizer::{NormalizationResources, TextNormalizer};
use crate::processing::ranker::{
    rank_scored, validate_options, Filters, RankingResult, ScoredDocument, DEFAULT_TOP_K,
};
use crate::processing::similarity;
use crate::processing::vectorizer::{TfIdfVectorizer, VectorSpace, VectorizerOptions};
use log::{debug, info};
use std::collections::HashSet;

/// Per-request ranking options
#[derive(Debug, Clone)]
pub struct RankOptions {
    pub top_k: usize,
    pub min_score: f32,
    pub filters: Filters,
    pub feedback: Option<Feedback>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_score: 0.0,
            filters: Filters::new(),
            feedback: None,
        }
    }
}

impl RankOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = Some(feedback);
        self
    }
}

/// Stateless ranking engine; each call fits its own model
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    normalizer: TextNormalizer,
    vectorizer: TfIdfVectorizer,
}

impl RankingEngine {
    pub fn new(normalizer: TextNormalizer, vectorizer: TfIdfVectorizer) -> Self {
        Self {
            normalizer,
            vectorizer,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let options = VectorizerOptions {
            ngram_range: (config.vectorizer.ngram_min, config.vectorizer.ngram_max),
            max_features: config.vectorizer.max_features,
            min_token_len: config.vectorizer.min_token_len,
        };
        Self::new(
            TextNormalizer::new(NormalizationResources::shared()),
            TfIdfVectorizer::new(options),
        )
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Rescaled similarity of every posting to the query, in corpus order
    pub fn similarities(&self, query_text: &str, documents: &[JobPosting]) -> Vec<f32> {
        let space = self.fit(query_text, documents);
        similarity::score(&space.document_vectors, &space.query_vector)
    }

    /// Rank postings against the query text. Posting ids must be unique.
    pub fn rank(
        &self,
        query_text: &str,
        documents: &[JobPosting],
        options: &RankOptions,
    ) -> Result<RankingResult> {
        Self::check_request(documents.len(), options)?;

        let mut seen = HashSet::with_capacity(documents.len());
        if let Some(duplicate) = documents.iter().find(|doc| !seen.insert(doc.id.as_str())) {
            return Err(JobMatcherError::invalid(format!(
                "posting id '{}' appears more than once",
                duplicate.id
            )));
        }

        if documents.is_empty() {
            info!("No postings to rank");
            return Ok(RankingResult::empty());
        }

        let scores = self.similarities(query_text, documents);
        Self::finish(documents.iter().cloned(), scores, options)
    }

    /// Rank the postings of a prebuilt index; the query is projected, not refit
    pub fn rank_indexed(
        &self,
        query_text: &str,
        index: &CorpusIndex,
        options: &RankOptions,
    ) -> Result<RankingResult> {
        Self::check_request(index.len(), options)?;

        if index.is_empty() {
            info!("No postings to rank");
            return Ok(RankingResult::empty());
        }

        let space = index.project(query_text);
        let scores = similarity::score(&space.document_vectors, &space.query_vector);
        Self::finish(index.postings().cloned(), scores, options)
    }

    /// Malformed options fail even when there is nothing to rank
    fn check_request(corpus_len: usize, options: &RankOptions) -> Result<()> {
        validate_options(options.min_score, options.top_k)?;
        match &options.feedback {
            Some(feedback) => feedback.check_covers(corpus_len),
            None => Ok(()),
        }
    }

    fn fit(&self, query_text: &str, documents: &[JobPosting]) -> VectorSpace {
        let texts: Vec<String> = documents
            .iter()
            .map(|doc| self.normalizer.normalize(&doc.scoring_text()))
            .collect();
        let query = self.normalizer.normalize(query_text);
        debug!("Normalized query: {} tokens", query.split_whitespace().count());

        let space = self.vectorizer.vectorize(&texts, &query);
        if space.is_degenerate() {
            debug!("All texts are empty after normalization");
        }
        space
    }

    fn finish<I>(postings: I, similarities: Vec<f32>, options: &RankOptions) -> Result<RankingResult>
    where
        I: Iterator<Item = JobPosting>,
    {
        let weighted = match &options.feedback {
            Some(feedback) => Some(combine(&similarities, Some(feedback))?),
            None => None,
        };

        let scored = postings
            .zip(similarities)
            .enumerate()
            .map(|(i, (posting, similarity))| ScoredDocument {
                posting,
                similarity,
                feedback_score: weighted.as_ref().map(|w| w[i]),
                corpus_index: i,
            })
            .collect();

        let result = rank_scored(scored, &options.filters, options.min_score, options.top_k)?;
        info!("Ranking produced {} matches", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::ATTR_LOCATION;
    use crate::processing::feedback::FeedbackCoverage;

    fn data_and_chef() -> Vec<JobPosting> {
        vec![
            JobPosting::new("1", "Data Scientist", "Python machine learning statistics"),
            JobPosting::new("2", "Chef", "cooking recipes kitchen"),
        ]
    }

    #[test]
    fn test_data_scientist_ranks_first() {
        let engine = RankingEngine::default();
        let docs = data_and_chef();
        let query = "I am skilled in Python and machine learning";

        let result = engine
            .rank(query, &docs, &RankOptions::default().with_top_k(1))
            .unwrap();
        assert_eq!(result.ids(), vec!["1"]);

        let scores = engine.similarities(query, &docs);
        assert!(result.documents[0].final_score() > scores[1]);
    }

    #[test]
    fn test_empty_corpus() {
        let engine = RankingEngine::default();
        let result = engine.rank("anything", &[], &RankOptions::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_degenerate_texts_score_zero() {
        let engine = RankingEngine::default();
        let docs = vec![
            JobPosting::new("1", "", "the and of"),
            JobPosting::new("2", "", "!!!"),
        ];

        let scores = engine.similarities("", &docs);
        assert_eq!(scores, vec![similarity::DEGENERATE_SCORE; 2]);

        let result = engine.rank("", &docs, &RankOptions::default()).unwrap();
        assert_eq!(result.ids(), vec!["1", "2"]);
    }

    #[test]
    fn test_feedback_changes_order() {
        let engine = RankingEngine::default();
        let docs = vec![
            JobPosting::new("a", "Rust Engineer", "rust systems"),
            JobPosting::new("b", "Rust Developer", "rust services"),
            JobPosting::new("c", "Chef", "kitchen"),
        ];
        let feedback = Feedback::from_ratings(&[1.0, 5.0], FeedbackCoverage::Prefix).unwrap();
        let options = RankOptions::default().with_feedback(feedback);

        let result = engine.rank("rust", &docs, &options).unwrap();
        assert_eq!(result.ids()[0], "b");
        assert!(result.documents.iter().all(|d| d.feedback_score.is_some()));
    }

    #[test]
    fn test_invalid_options_fail_fast() {
        let engine = RankingEngine::default();
        let docs = data_and_chef();

        let zero_k = RankOptions::default().with_top_k(0);
        assert!(engine.rank("python", &docs, &zero_k).unwrap_err().is_invalid_input());

        let mismatched = RankOptions::default()
            .with_feedback(Feedback::new(vec![1.0], FeedbackCoverage::Full).unwrap());
        assert!(engine.rank("python", &docs, &mismatched).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_empty_corpus_still_checks_feedback() {
        let engine = RankingEngine::default();
        let feedback = Feedback::new(vec![1.0, 0.5, 0.5], FeedbackCoverage::Full).unwrap();
        let options = RankOptions::default().with_feedback(feedback);

        let err = engine.rank("python", &[], &options).unwrap_err();
        assert!(err.is_invalid_input());

        let index = CorpusIndex::new(engine.normalizer().clone(), TfIdfVectorizer::default());
        assert!(engine.rank_indexed("python", &index, &options).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let engine = RankingEngine::default();
        let docs = vec![
            JobPosting::new("1", "Data Scientist", "python"),
            JobPosting::new("1", "Chef", "kitchen"),
        ];

        let err = engine.rank("python", &docs, &RankOptions::default()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_filters_applied_after_scoring() {
        let engine = RankingEngine::default();
        let docs = vec![
            JobPosting::new("1", "Data Scientist", "python").with_attribute(ATTR_LOCATION, "Boston"),
            JobPosting::new("2", "Python Developer", "python django").with_attribute(ATTR_LOCATION, "Austin"),
        ];
        let options = RankOptions::default()
            .with_filters(Filters::new().with(ATTR_LOCATION, ["Austin"]));

        let result = engine.rank("python", &docs, &options).unwrap();
        assert_eq!(result.ids(), vec!["2"]);
        assert_eq!(result.documents[0].corpus_index, 1);
    }

    #[test]
    fn test_indexed_ranking_matches_intent() {
        let engine = RankingEngine::default();
        let index = CorpusIndex::build(
            data_and_chef(),
            engine.normalizer().clone(),
            TfIdfVectorizer::default(),
        )
        .unwrap();

        let result = engine
            .rank_indexed("python machine learning", &index, &RankOptions::default())
            .unwrap();
        assert_eq!(result.ids(), vec!["1", "2"]);
        assert_eq!(result.documents[0].final_score(), 1.0);
    }
}
