//! Resume text extraction from PDF, plain text and markdown bytes
//!
//! Extraction never fails: a document that cannot be parsed yields empty text
//! and a warning the caller may show.

use crate::input::file_detector::FileType;
use log::warn;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::panic;

/// Extracted text plus an optional warning about degraded input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub warning: Option<String>,
}

impl Extraction {
    fn ok(text: String) -> Self {
        Self { text, warning: None }
    }

    fn degraded(text: String, warning: String) -> Self {
        warn!("{}", warning);
        Self {
            text,
            warning: Some(warning),
        }
    }
}

/// Extract plain text from file bytes of the given MIME type
pub fn extract_text(bytes: &[u8], mime_type: &str) -> Extraction {
    match FileType::from_mime(mime_type) {
        FileType::Pdf => extract_pdf(bytes),
        FileType::Text => decode_utf8(bytes),
        FileType::Markdown => {
            let decoded = decode_utf8(bytes);
            Extraction {
                text: markdown_to_text(&decoded.text),
                warning: decoded.warning,
            }
        }
        FileType::Unknown => Extraction::degraded(
            String::new(),
            format!("Unsupported resume format: {}", mime_type),
        ),
    }
}

fn extract_pdf(bytes: &[u8]) -> Extraction {
    // pdf-extract panics on some malformed documents
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Extraction::ok(text),
        Ok(Err(e)) => Extraction::degraded(String::new(), format!("Error reading PDF: {}", e)),
        Err(_) => Extraction::degraded(String::new(), "Error reading PDF: parser aborted".to_string()),
    }
}

fn decode_utf8(bytes: &[u8]) -> Extraction {
    match std::str::from_utf8(bytes) {
        Ok(text) => Extraction::ok(text.to_string()),
        Err(_) => Extraction::degraded(
            String::from_utf8_lossy(bytes).into_owned(),
            "Resume is not valid UTF-8; invalid bytes were replaced".to_string(),
        ),
    }
}

/// Render markdown and strip the resulting tags
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ");

    let tag_regex = Regex::new(r"<[^>]*>").expect("Invalid tag regex");
    let clean_text = tag_regex.replace_all(&text, "");

    let clean_text = clean_text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    clean_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let extraction = extract_text(b"Rust developer", "text/plain");
        assert_eq!(extraction.text, "Rust developer");
        assert!(extraction.warning.is_none());
    }

    #[test]
    fn test_markdown_strips_formatting() {
        let extraction = extract_text(b"## Skills\n\n**Rust** & Python", "text/markdown");
        assert_eq!(extraction.text, "Skills\nRust & Python");
    }

    #[test]
    fn test_invalid_pdf_degrades_to_empty() {
        let extraction = extract_text(b"definitely not a pdf", "application/pdf");
        assert!(extraction.text.is_empty());
        assert!(extraction.warning.is_some());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let extraction = extract_text(&[b'o', b'k', 0xff], "text/plain");
        assert!(extraction.text.starts_with("ok"));
        assert!(extraction.warning.is_some());
    }

    #[test]
    fn test_unknown_mime_type() {
        let extraction = extract_text(b"data", "image/png");
        assert!(extraction.text.is_empty());
        assert!(extraction.warning.unwrap().contains("image/png"));
    }
}
