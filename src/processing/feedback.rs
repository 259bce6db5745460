//! User feedback weighting

use crate::error::{JobMatcherError, Result};
use serde::{Deserialize, Serialize};

/// Which documents a feedback vector describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackCoverage {
    /// One weight per document
    Full,
    /// Weights for the leading documents only; the rest keep a multiplier of 1.0
    Prefix,
}

/// Relevance weights in [0, 1], aligned by index with the documents they describe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    weights: Vec<f32>,
    coverage: FeedbackCoverage,
}

impl Feedback {
    /// Use already-normalized weights
    pub fn new(weights: Vec<f32>, coverage: FeedbackCoverage) -> Result<Self> {
        if let Some(bad) = weights
            .iter()
            .find(|w| !w.is_finite() || **w < 0.0 || **w > 1.0)
        {
            return Err(JobMatcherError::invalid(format!(
                "feedback weight {} is outside [0, 1]",
                bad
            )));
        }
        Ok(Self { weights, coverage })
    }

    /// Normalize raw ratings (e.g. 1-5 stars) by dividing by their maximum
    pub fn from_ratings(ratings: &[f32], coverage: FeedbackCoverage) -> Result<Self> {
        if ratings.is_empty() {
            return Err(JobMatcherError::invalid("feedback ratings are empty"));
        }
        if ratings.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(JobMatcherError::invalid(
                "feedback ratings must be finite and non-negative",
            ));
        }

        let max = ratings.iter().copied().fold(0.0f32, f32::max);
        if max <= 0.0 {
            return Err(JobMatcherError::invalid(
                "feedback ratings need at least one positive value",
            ));
        }

        Self::new(ratings.iter().map(|r| r / max).collect(), coverage)
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn coverage(&self) -> FeedbackCoverage {
        self.coverage
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Fail when the weights cannot describe `len` documents
    pub fn check_covers(&self, len: usize) -> Result<()> {
        match self.coverage {
            FeedbackCoverage::Full if self.weights.len() != len => Err(JobMatcherError::invalid(format!(
                "feedback has {} weights but there are {} scores",
                self.weights.len(),
                len
            ))),
            FeedbackCoverage::Prefix if self.weights.len() > len => Err(JobMatcherError::invalid(format!(
                "feedback covers {} documents but there are only {} scores",
                self.weights.len(),
                len
            ))),
            _ => Ok(()),
        }
    }

    /// Multiplier for the document at `index`
    pub fn weight_for(&self, index: usize) -> f32 {
        self.weights.get(index).copied().unwrap_or(1.0)
    }
}

/// Multiply scores element-wise by feedback weights; no feedback leaves scores unchanged
pub fn combine(scores: &[f32], feedback: Option<&Feedback>) -> Result<Vec<f32>> {
    let Some(feedback) = feedback else {
        return Ok(scores.to_vec());
    };

    feedback.check_covers(scores.len())?;

    Ok(scores
        .iter()
        .enumerate()
        .map(|(i, score)| score * feedback.weight_for(i))
        .collect())
}
