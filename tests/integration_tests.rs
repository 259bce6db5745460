//! Integration tests for the job matcher

use job_matcher::input::manager::InputManager;
use job_matcher::output::formatter::{OutputFormatter, MarkdownFormatter};
use job_matcher::output::report::{MatchReport, ReportMetadata};
use job_matcher::processing::document::{JobPosting, ATTR_EMPLOYMENT_TYPE};
use job_matcher::processing::engine::{RankOptions, RankingEngine};
use job_matcher::processing::feedback::{combine, Feedback, FeedbackCoverage};
use job_matcher::processing::ranker::{rank, Filters};
use job_matcher::sources::catalog::StaticCatalog;
use job_matcher::sources::{JobQuery, JobSource};
use std::path::Path;

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[test]
fn test_data_scientist_beats_chef() {
    let engine = RankingEngine::default();
    let postings = vec![
        JobPosting::new("1", "Data Scientist", "Python machine learning statistics"),
        JobPosting::new("2", "Chef", "cooking recipes kitchen"),
    ];

    let result = engine
        .rank(
            "I am skilled in Python and machine learning",
            &postings,
            &RankOptions::default().with_top_k(1),
        )
        .unwrap();

    assert_eq!(result.ids(), vec!["1"]);
}

#[test]
fn test_empty_corpus_gives_empty_result() {
    let engine = RankingEngine::default();
    let result = engine
        .rank("python developer", &[], &RankOptions::default())
        .unwrap();

    assert!(result.is_empty());

    let report = MatchReport::new(result, ReportMetadata::new("keywords", "static catalog"));
    let markdown = MarkdownFormatter::new(false, 100).format_report(&report).unwrap();
    assert!(markdown.contains("No jobs found"));
}

#[test]
fn test_feedback_ratings_normalized_by_maximum() {
    let feedback = Feedback::from_ratings(&[5.0, 1.0, 1.0], FeedbackCoverage::Full).unwrap();
    assert_eq!(feedback.weights(), &[1.0, 0.2, 0.2]);

    let combined = combine(&[0.5, 0.5, 0.5], Some(&feedback)).unwrap();
    assert_eq!(combined, vec![0.5, 0.1, 0.1]);

    let postings = vec![
        JobPosting::new("0", "Data Scientist", "python statistics"),
        JobPosting::new("1", "Data Engineer", "python pipelines"),
        JobPosting::new("2", "Data Analyst", "python dashboards"),
    ];
    let result = rank(&postings, &combined, &Filters::new(), 0.0, 10).unwrap();
    assert_eq!(result.ids(), vec!["0", "1", "2"]);
}

#[tokio::test]
async fn test_catalog_ranking_end_to_end() {
    let catalog = StaticCatalog::new();
    let outcome = catalog.fetch(&JobQuery::default()).await;
    assert!(outcome.warning.is_none());
    assert_eq!(outcome.postings.len(), 20);

    let engine = RankingEngine::default();
    let result = engine
        .rank(
            "Designer experienced in Figma and Sketch, user research, prototyping and wireframing",
            &outcome.postings,
            &RankOptions::default().with_top_k(3),
        )
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.documents[0].posting.title, "UX Designer");
    assert_eq!(result.documents[0].final_score(), 1.0);
    let scores: Vec<f32> = result.iter().map(|d| d.final_score()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_catalog_ranking_with_filters() {
    let catalog = StaticCatalog::new();
    let postings = catalog.fetch(&JobQuery::default()).await.postings;

    let engine = RankingEngine::default();
    let options = RankOptions::default()
        .with_top_k(20)
        .with_filters(Filters::new().with(ATTR_EMPLOYMENT_TYPE, ["Contract"]));
    let result = engine.rank("python", &postings, &options).unwrap();

    assert!(result
        .iter()
        .all(|d| d.posting.attribute(ATTR_EMPLOYMENT_TYPE) == ["Contract"]));
}
