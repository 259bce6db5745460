//! Text matching and ranking module

pub mod document;
pub mod stopwords;
pub mod lemmatizer;
pub mod normalizer;
pub mod vectorizer;
pub mod similarity;
pub mod feedback;
pub mod ranker;
pub mod index;
pub mod engine;
