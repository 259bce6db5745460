//! Incrementally maintained posting index
//!
//! Keeps per-posting term counts and corpus document frequencies so postings
//! can be added or removed without refitting. Queries are projected into the
//! corpus vocabulary: query terms the corpus has never seen carry no weight,
//! and the query does not contribute to document frequencies.

use crate::error::{JobMatcherError, Result};
use crate::processing::document::JobPosting;
use crate::processing::normalizer::TextNormalizer;
use crate::processing::vectorizer::{smoothed_idf, weigh, TfIdfVectorizer, VectorSpace};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
struct IndexedPosting {
    posting: JobPosting,
    counts: HashMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct CorpusIndex {
    normalizer: TextNormalizer,
    vectorizer: TfIdfVectorizer,
    entries: Vec<IndexedPosting>,
    document_frequency: BTreeMap<String, u32>,
}

impl CorpusIndex {
    pub fn new(normalizer: TextNormalizer, vectorizer: TfIdfVectorizer) -> Self {
        Self {
            normalizer,
            vectorizer,
            entries: Vec::new(),
            document_frequency: BTreeMap::new(),
        }
    }

    pub fn build<I>(postings: I, normalizer: TextNormalizer, vectorizer: TfIdfVectorizer) -> Result<Self>
    where
        I: IntoIterator<Item = JobPosting>,
    {
        let mut index = Self::new(normalizer, vectorizer);
        for posting in postings {
            index.insert(posting)?;
        }
        log::info!(
            "Built posting index: {} postings, {} terms",
            index.len(),
            index.vocabulary_size()
        );
        Ok(index)
    }

    /// Add a posting; ids must be unique
    pub fn insert(&mut self, posting: JobPosting) -> Result<()> {
        if self.entries.iter().any(|e| e.posting.id == posting.id) {
            return Err(JobMatcherError::invalid(format!(
                "posting '{}' is already indexed",
                posting.id
            )));
        }

        let normalized = self.normalizer.normalize(&posting.scoring_text());
        let counts = self.vectorizer.term_counts(&normalized);
        for term in counts.keys() {
            *self.document_frequency.entry(term.clone()).or_insert(0) += 1;
        }

        self.entries.push(IndexedPosting { posting, counts });
        Ok(())
    }

    /// Remove a posting by id, keeping the order of the others
    pub fn remove(&mut self, id: &str) -> Option<JobPosting> {
        let position = self.entries.iter().position(|e| e.posting.id == id)?;
        let entry = self.entries.remove(position);

        for term in entry.counts.keys() {
            if let Some(df) = self.document_frequency.get_mut(term) {
                *df -= 1;
                if *df == 0 {
                    self.document_frequency.remove(term);
                }
            }
        }
        Some(entry.posting)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.document_frequency.len()
    }

    pub fn postings(&self) -> impl Iterator<Item = &JobPosting> {
        self.entries.iter().map(|e| &e.posting)
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Document vectors of the current corpus plus the query projected into them
    pub fn project(&self, query: &str) -> VectorSpace {
        if self.entries.is_empty() {
            return VectorSpace::default();
        }

        let terms: Vec<String> = self.document_frequency.keys().cloned().collect();
        let lookup: HashMap<&str, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let n_docs = self.entries.len();
        let idf: Vec<f32> = self
            .document_frequency
            .values()
            .map(|&df| smoothed_idf(n_docs, df as usize))
            .collect();

        let document_vectors = self
            .entries
            .iter()
            .map(|e| weigh(&e.counts, |t| lookup.get(t).copied(), &idf))
            .collect();

        let normalized_query = self.normalizer.normalize(query);
        let query_counts = self.vectorizer.term_counts(&normalized_query);
        let query_vector = weigh(&query_counts, |t| lookup.get(t).copied(), &idf);

        VectorSpace {
            terms,
            idf,
            document_vectors,
            query_vector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(postings: Vec<JobPosting>) -> CorpusIndex {
        CorpusIndex::build(postings, TextNormalizer::default(), TfIdfVectorizer::default()).unwrap()
    }

    #[test]
    fn test_build_and_project() {
        let index = index_of(vec![
            JobPosting::new("1", "Data Scientist", "Python machine learning statistics"),
            JobPosting::new("2", "Chef", "cooking recipes kitchen"),
        ]);

        assert_eq!(index.len(), 2);
        let space = index.project("Python and Rust");
        assert_eq!(space.document_vectors.len(), 2);
        // rust is unknown to the corpus and is not added
        assert!(space.term_index("rust").is_none());
        assert!(!space.query_vector.is_zero());
        assert_eq!(space.vocabulary_size(), index.vocabulary_size());
    }

    #[test]
    fn test_insert_and_remove_update_statistics() {
        let mut index = index_of(vec![JobPosting::new("1", "Chef", "kitchen")]);
        let before = index.vocabulary_size();

        index.insert(JobPosting::new("2", "Baker", "bread kitchen")).unwrap();
        assert_eq!(index.vocabulary_size(), before + 2);

        let removed = index.remove("2").unwrap();
        assert_eq!(removed.title, "Baker");
        assert_eq!(index.vocabulary_size(), before);
        assert!(index.remove("2").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut index = index_of(vec![JobPosting::new("1", "Chef", "kitchen")]);
        let err = index.insert(JobPosting::new("1", "Other", "text")).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_empty_index_projection() {
        let index = index_of(Vec::new());
        let space = index.project("python");
        assert!(space.document_vectors.is_empty());
    }
}
