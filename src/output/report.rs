//! Report structures wrapping a ranking result for presentation

use crate::processing::ranker::{RankingResult, ScoredDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ranking result plus the context needed to present it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub summary: MatchSummary,
    pub matches: Vec<ScoredDocument>,
    pub metadata: ReportMetadata,
}

/// Aggregate statistics over the returned matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total_matches: usize,
    /// Mean match percentage (0-100)
    pub average_match: f32,
    /// Highest match percentage (0-100)
    pub best_match: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub matcher_version: String,
    /// Resume file, "pasted text" or "keywords"
    pub query_source: String,
    pub posting_source: String,
    pub postings_considered: usize,
    pub feedback_applied: bool,
    pub processing_time_ms: u64,
    /// Warnings from the resume extractor or the job source
    pub warnings: Vec<String>,
}

impl ReportMetadata {
    pub fn new(query_source: impl Into<String>, posting_source: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            matcher_version: env!("CARGO_PKG_VERSION").to_string(),
            query_source: query_source.into(),
            posting_source: posting_source.into(),
            postings_considered: 0,
            feedback_applied: false,
            processing_time_ms: 0,
            warnings: Vec::new(),
        }
    }
}

impl MatchSummary {
    pub fn from_matches(matches: &[ScoredDocument]) -> Self {
        if matches.is_empty() {
            return Self {
                total_matches: 0,
                average_match: 0.0,
                best_match: 0.0,
            };
        }

        let percentages: Vec<f32> = matches.iter().map(ScoredDocument::match_percentage).collect();
        let average = percentages.iter().sum::<f32>() / percentages.len() as f32;
        let best = percentages.iter().copied().fold(0.0f32, f32::max);

        Self {
            total_matches: matches.len(),
            average_match: (average * 10.0).round() / 10.0,
            best_match: best,
        }
    }
}

impl MatchReport {
    pub fn new(result: RankingResult, metadata: ReportMetadata) -> Self {
        Self {
            summary: MatchSummary::from_matches(&result.documents),
            matches: result.documents,
            metadata,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Qualitative band for a match percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchBand {
    Strong,
    Moderate,
    Weak,
}

impl MatchBand {
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage >= 70.0 {
            MatchBand::Strong
        } else if percentage >= 50.0 {
            MatchBand::Moderate
        } else {
            MatchBand::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchBand::Strong => "STRONG",
            MatchBand::Moderate => "MODERATE",
            MatchBand::Weak => "WEAK",
        }
    }
}

/// Cut text to `max_chars` characters, appending "..." when shortened
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::JobPosting;

    fn scored(id: &str, score: f32) -> ScoredDocument {
        ScoredDocument {
            posting: JobPosting::new(id, "Title", "Body"),
            similarity: score,
            feedback_score: None,
            corpus_index: 0,
        }
    }

    #[test]
    fn test_summary_statistics() {
        let summary = MatchSummary::from_matches(&[scored("a", 1.0), scored("b", 0.5), scored("c", 0.25)]);

        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.best_match, 100.0);
        assert_eq!(summary.average_match, 58.3);
    }

    #[test]
    fn test_empty_summary() {
        let report = MatchReport::new(RankingResult::empty(), ReportMetadata::new("keywords", "static catalog"));
        assert!(report.is_empty());
        assert_eq!(report.summary.total_matches, 0);
    }

    #[test]
    fn test_bands_and_preview() {
        assert_eq!(MatchBand::from_percentage(70.0), MatchBand::Strong);
        assert_eq!(MatchBand::from_percentage(69.9), MatchBand::Moderate);
        assert_eq!(MatchBand::from_percentage(10.0), MatchBand::Weak);

        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef ghij", 7), "abcdef...");
    }
}
