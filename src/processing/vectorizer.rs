//! TF-IDF vectorization of a posting corpus together with the query
//!
//! Weights use raw term counts and smoothed inverse document frequency,
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, and every row is L2-normalized.
//! The model is fit jointly over the documents and the query, so both always
//! share one vocabulary.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerOptions {
    /// Inclusive range of n-gram sizes
    pub ngram_range: (usize, usize),
    /// Keep only the most frequent terms across the fitted texts
    pub max_features: Option<usize>,
    /// Tokens shorter than this (in characters) are ignored
    pub min_token_len: usize,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self {
            ngram_range: (1, 1),
            max_features: None,
            min_token_len: 2,
        }
    }
}

/// Sparse non-negative vector, entries sorted by column index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    pub fn from_entries(mut entries: Vec<(usize, f32)>) -> Self {
        entries.retain(|&(_, weight)| weight != 0.0);
        entries.sort_by_key(|&(index, _)| index);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f32 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Scale to unit length; zero vectors stay zero
    pub fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
        self
    }
}

/// Fitted term space for one ranking request
#[derive(Debug, Clone, Default)]
pub struct VectorSpace {
    pub terms: Vec<String>,
    pub idf: Vec<f32>,
    pub document_vectors: Vec<SparseVector>,
    pub query_vector: SparseVector,
}

impl VectorSpace {
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// True when every fitted text was empty
    pub fn is_degenerate(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    options: VectorizerOptions,
}

impl TfIdfVectorizer {
    pub fn new(options: VectorizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &VectorizerOptions {
        &self.options
    }

    /// Fit over `documents + [query]` and return the document and query vectors
    pub fn vectorize<S: AsRef<str>>(&self, documents: &[S], query: &str) -> VectorSpace {
        if documents.is_empty() {
            return VectorSpace::default();
        }

        let mut counts: Vec<HashMap<String, u32>> = documents
            .iter()
            .map(|doc| self.term_counts(doc.as_ref()))
            .collect();
        counts.push(self.term_counts(query));

        let terms = self.select_vocabulary(&counts);
        let index: HashMap<&str, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let mut document_frequency = vec![0u32; terms.len()];
        for text_counts in &counts {
            for term in text_counts.keys() {
                if let Some(&i) = index.get(term.as_str()) {
                    document_frequency[i] += 1;
                }
            }
        }

        let n_texts = counts.len();
        let idf: Vec<f32> = document_frequency
            .iter()
            .map(|&df| smoothed_idf(n_texts, df as usize))
            .collect();

        let mut vectors: Vec<SparseVector> = counts
            .iter()
            .map(|text_counts| weigh(text_counts, |term| index.get(term).copied(), &idf))
            .collect();
        let query_vector = vectors.pop().unwrap_or_default();

        log::debug!(
            "Fitted TF-IDF space: {} texts, {} terms",
            n_texts,
            terms.len()
        );

        VectorSpace {
            terms,
            idf,
            document_vectors: vectors,
            query_vector,
        }
    }

    /// Split normalized text into the terms counted by the model
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .filter(|token| token.chars().count() >= self.options.min_token_len)
            .collect();

        let (min_n, max_n) = self.options.ngram_range;
        let min_n = min_n.max(1);
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    pub fn term_counts(&self, text: &str) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for term in self.analyze(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }

    fn select_vocabulary(&self, counts: &[HashMap<String, u32>]) -> Vec<String> {
        let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
        for text_counts in counts {
            for (term, count) in text_counts {
                *totals.entry(term.as_str()).or_insert(0) += count;
            }
        }

        match self.options.max_features {
            Some(limit) if limit < totals.len() => {
                let mut ranked: Vec<(&str, u32)> = totals.into_iter().collect();
                // BTreeMap order makes the tie-break alphabetical
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                ranked.truncate(limit);
                let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
                terms.sort();
                terms
            }
            _ => totals.into_keys().map(str::to_string).collect(),
        }
    }
}

pub(crate) fn smoothed_idf(n_texts: usize, document_frequency: usize) -> f32 {
    ((1.0 + n_texts as f32) / (1.0 + document_frequency as f32)).ln() + 1.0
}

/// Weight raw counts by IDF and L2-normalize; terms outside the vocabulary are dropped
pub(crate) fn weigh<F>(counts: &HashMap<String, u32>, lookup: F, idf: &[f32]) -> SparseVector
where
    F: Fn(&str) -> Option<usize>,
{
    let entries = counts
        .iter()
        .filter_map(|(term, &count)| lookup(term).map(|i| (i, count as f32 * idf[i])))
        .collect();
    SparseVector::from_entries(entries).l2_normalized()
}
