//! Text normalization: lowercase, strip punctuation, tokenize, drop stopwords, lemmatize

use crate::processing::lemmatizer::Lemmatizer;
use crate::processing::stopwords::english_stopwords;
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use unicode_segmentation::UnicodeSegmentation;

/// Read-only resources shared by every normalizer in the process
#[derive(Debug)]
pub struct NormalizationResources {
    stopwords: HashSet<&'static str>,
    lemmatizer: Lemmatizer,
}

impl NormalizationResources {
    pub fn english() -> Self {
        Self {
            stopwords: english_stopwords(),
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// Process-wide instance, built on first use and never mutated
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<NormalizationResources>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::english())).clone()
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }
}

/// Normalized token sequence derived from a text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    pub tokens: Vec<String>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    resources: Arc<NormalizationResources>,
    punctuation: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(NormalizationResources::shared())
    }
}

impl TextNormalizer {
    pub fn new(resources: Arc<NormalizationResources>) -> Self {
        let punctuation = Regex::new(r"[\p{P}\p{S}]").expect("Invalid punctuation regex");

        Self {
            resources,
            punctuation,
        }
    }

    /// Normalize text into its space-joined token form
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_tokens(text).joined()
    }

    pub fn normalize_tokens(&self, text: &str) -> NormalizedText {
        if text.trim().is_empty() {
            return NormalizedText::default();
        }

        let lowered = text.to_lowercase();
        let stripped = self.punctuation.replace_all(&lowered, "");

        let tokens = stripped
            .unicode_words()
            .filter(|word| !self.resources.is_stopword(word))
            .map(|word| self.resources.lemmatizer().lemmatize(word))
            // a lemma may itself be a stopword ("hims" -> "him")
            .filter(|lemma| !lemma.is_empty() && !self.resources.is_stopword(lemma))
            .collect();

        NormalizedText { tokens }
    }

    pub fn normalize_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|text| self.normalize(text.as_ref())).collect()
    }
}
