//! Cosine similarity scoring with per-request min-max rescaling

use crate::processing::vectorizer::SparseVector;

/// Rescaled score assigned to every document when all similarities are equal
pub const DEGENERATE_SCORE: f32 = 0.0;

/// Cosine similarity; zero-length vectors score 0
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0)
}

/// Raw cosine similarity of each document against the query
pub fn raw_scores(document_vectors: &[SparseVector], query_vector: &SparseVector) -> Vec<f32> {
    document_vectors
        .iter()
        .map(|doc| cosine_similarity(doc, query_vector))
        .collect()
}

/// Rescale a batch into [0, 1] by `(s - min) / (max - min)`
pub fn min_max_rescale(scores: &[f32]) -> Vec<f32> {
    let Some(first) = scores.first() else {
        return Vec::new();
    };

    let (min, max) = scores
        .iter()
        .fold((*first, *first), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    let range = max - min;

    if range <= f32::EPSILON {
        return vec![DEGENERATE_SCORE; scores.len()];
    }

    scores
        .iter()
        .map(|&s| ((s - min) / range).clamp(0.0, 1.0))
        .collect()
}

/// One rescaled score per document
pub fn score(document_vectors: &[SparseVector], query_vector: &SparseVector) -> Vec<f32> {
    let raw = raw_scores(document_vectors, query_vector);
    log::debug!("Raw cosine similarities: {:?}", raw);
    min_max_rescale(&raw)
}
