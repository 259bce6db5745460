//! Rule-based noun lemmatizer
//!
//! Irregular forms are looked up in a fixed table, regular plurals are reduced
//! by suffix rules. Every lemma produced is a fixed point: lemmatizing it again
//! returns it unchanged.

use std::borrow::Cow;
use std::collections::HashMap;

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("theses", "thesis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("curricula", "curriculum"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("always", "always"),
    ("sales", "sales"),
    ("kubernetes", "kubernetes"),
    // -ie nouns
    ("cookies", "cookie"),
    ("movies", "movie"),
    ("selfies", "selfie"),
    ("calories", "calorie"),
    ("rookies", "rookie"),
    ("zombies", "zombie"),
    ("hoodies", "hoodie"),
    ("smoothies", "smoothie"),
    ("newbies", "newbie"),
    ("freebies", "freebie"),
];

/// Singulars ending in "che"; their plurals only drop the "s"
const CHE_SINGULARS: &[&str] = &[
    "ache", "cache", "niche", "headache", "avalanche", "cliche", "quiche", "psyche", "creche",
    "moustache", "mustache", "tranche",
];

/// Singulars ending in "us"; their plurals drop "es"
const US_SINGULARS: &[&str] = &[
    "status", "bus", "virus", "bonus", "campus", "census", "focus", "corpus", "syllabus",
    "prospectus", "consensus", "stimulus", "apparatus", "cactus", "octopus", "nexus", "plus",
];

/// Suffixes that mark a word as already singular
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Plural endings reduced by dropping "es"
const ES_ENDINGS: &[&str] = &["sses", "shes", "ches", "xes"];

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
        }
    }

    /// Reduce a lowercase token to its lemma
    pub fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.irregular.get(token) {
            return (*lemma).to_string();
        }

        let reduced = Self::reduce_plural(token);
        match self.irregular.get(reduced.as_ref()) {
            Some(lemma) => (*lemma).to_string(),
            None => reduced.into_owned(),
        }
    }

    fn reduce_plural(token: &str) -> Cow<'_, str> {
        if token.chars().count() <= 3 || !token.chars().all(char::is_alphabetic) {
            return Cow::Borrowed(token);
        }
        if SINGULAR_ENDINGS.iter().any(|ending| token.ends_with(ending)) {
            return Cow::Borrowed(token);
        }

        if let Some(stem) = token.strip_suffix('s') {
            if CHE_SINGULARS.contains(&stem) {
                return Cow::Borrowed(stem);
            }
        }
        if let Some(stem) = token.strip_suffix("es") {
            if US_SINGULARS.contains(&stem) {
                return Cow::Borrowed(stem);
            }
        }

        if token.len() > 4 {
            if let Some(stem) = token.strip_suffix("ies") {
                return Cow::Owned(format!("{}y", stem));
            }
        }
        if ES_ENDINGS.iter().any(|ending| token.ends_with(ending)) {
            return Cow::Borrowed(&token[..token.len() - 2]);
        }
        match token.strip_suffix('s') {
            Some(stem) => Cow::Borrowed(stem),
            None => Cow::Borrowed(token),
        }
    }

    pub fn irregular_lemmas(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.irregular.values().copied()
    }
}
