//! Output formatters for match reports

use crate::config::OutputFormat;
use crate::error::{JobMatcherError, Result};
use crate::output::report::{preview, MatchBand, MatchReport};
use crate::processing::document::{JobPosting, ATTR_EMPLOYMENT_TYPE, ATTR_LOCATION, ATTR_SALARY_RANGE};
use crate::processing::ranker::ScoredDocument;
use colored::{Color, Colorize};
use std::path::Path;

pub const NO_JOBS_MESSAGE: &str = "No jobs found matching your criteria. Try adjusting the filters.";

pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    preview_chars: usize,
}

/// JSON for scripting
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    preview_chars: usize,
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn location_line(posting: &JobPosting) -> String {
    let mut parts = Vec::new();
    if let Some(company) = &posting.company {
        parts.push(company.clone());
    }
    let locations = posting.attribute(ATTR_LOCATION);
    if !locations.is_empty() {
        parts.push(locations.join(", "));
    }
    if let Some(kind) = posting.primary_attribute(ATTR_EMPLOYMENT_TYPE) {
        parts.push(kind.to_string());
    }
    parts.join(" | ")
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, preview_chars: usize) -> Self {
        Self {
            use_colors,
            preview_chars,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n# {}\n", title)
        }
    }

    fn format_score_badge(&self, percentage: f32) -> String {
        let band = MatchBand::from_percentage(percentage);
        let color = match band {
            MatchBand::Strong => Color::Green,
            MatchBand::Moderate => Color::Yellow,
            MatchBand::Weak => Color::Red,
        };
        let badge = format!("{:.1}% {}", percentage, band.label());

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_match(&self, rank: usize, scored: &ScoredDocument) -> String {
        let posting = &scored.posting;
        let mut output = String::new();

        let title = if self.use_colors {
            posting.title.bold().to_string()
        } else {
            posting.title.clone()
        };
        output.push_str(&format!(
            "{:>2}. {} {}\n",
            rank,
            title,
            self.format_score_badge(scored.match_percentage())
        ));

        let details = location_line(posting);
        if !details.is_empty() {
            output.push_str(&format!("    {}\n", self.colorize(&details, Color::Cyan)));
        }
        output.push_str(&format!("    {}\n", preview(&posting.body, self.preview_chars)));
        if !posting.skills.is_empty() {
            output.push_str(&format!("    Skills: {}\n", posting.skills.join(", ")));
        }
        if let Some(salary) = posting.primary_attribute(ATTR_SALARY_RANGE) {
            output.push_str(&format!("    Salary: {}\n", salary));
        }
        if let Some(url) = &posting.url {
            output.push_str(&format!("    Apply: {}\n", url));
        }
        if let Some(weighted) = scored.feedback_score {
            output.push_str(&format!(
                "    Similarity {:.1}% -> {:.1}% after feedback\n",
                scored.similarity * 100.0,
                weighted * 100.0
            ));
        }
        output
    }

    /// Plain listing of postings without scores
    pub fn format_listing(&self, postings: &[JobPosting]) -> String {
        let mut output = self.format_header(&format!("Available Jobs ({})", postings.len()));
        for posting in postings {
            output.push_str(&format!("\n• {}\n", posting.title));
            let details = location_line(posting);
            if !details.is_empty() {
                output.push_str(&format!("  {}\n", self.colorize(&details, Color::Cyan)));
            }
            output.push_str(&format!("  {}\n", preview(&posting.body, self.preview_chars)));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!(
            "Top Job Matches ({} found)",
            report.summary.total_matches
        )));
        output.push_str(&format!(
            "Generated: {} | Source: {} | Postings considered: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.posting_source,
            report.metadata.postings_considered
        ));

        for warning in &report.metadata.warnings {
            output.push_str(&format!("{}\n", self.colorize(&format!("Warning: {}", warning), Color::Yellow)));
        }

        if report.is_empty() {
            output.push_str(&format!("\n{}\n", self.colorize(NO_JOBS_MESSAGE, Color::Yellow)));
            return Ok(output);
        }

        output.push_str(&format!(
            "Average Match: {:.1}% | Best Match: {:.1}% | Total Jobs: {}\n\n",
            report.summary.average_match, report.summary.best_match, report.summary.total_matches
        ));

        for (i, scored) in report.matches.iter().enumerate() {
            output.push_str(&self.format_match(i + 1, scored));
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, preview_chars: usize) -> Self {
        Self {
            include_metadata,
            preview_chars,
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut content = String::new();

        content.push_str("# Job Matches\n\n");
        if report.is_empty() {
            content.push_str(NO_JOBS_MESSAGE);
            content.push('\n');
        } else {
            content.push_str("| Metric | Value |\n|---|---|\n");
            content.push_str(&format!("| Average Match | {:.1}% |\n", report.summary.average_match));
            content.push_str(&format!("| Best Match | {:.1}% |\n", report.summary.best_match));
            content.push_str(&format!("| Total Jobs | {} |\n\n", report.summary.total_matches));

            for (i, scored) in report.matches.iter().enumerate() {
                let posting = &scored.posting;
                content.push_str(&format!(
                    "## {}. {} ({:.1}% match)\n\n",
                    i + 1,
                    posting.title,
                    scored.match_percentage()
                ));
                let details = location_line(posting);
                if !details.is_empty() {
                    content.push_str(&format!("**{}**\n\n", details));
                }
                content.push_str(&format!("{}\n\n", preview(&posting.body, self.preview_chars)));
                if !posting.skills.is_empty() {
                    content.push_str(&format!("- **Required Skills:** {}\n", posting.skills.join(", ")));
                }
                if let Some(salary) = posting.primary_attribute(ATTR_SALARY_RANGE) {
                    content.push_str(&format!("- **Salary Range:** {}\n", salary));
                }
                if let Some(url) = &posting.url {
                    content.push_str(&format!("- [Apply here]({})\n", url));
                }
                content.push('\n');
            }
        }

        if self.include_metadata {
            content.push_str("---\n\n");
            content.push_str(&format!(
                "Generated {} by job-matcher v{} from {} ({} postings considered)\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.matcher_version,
                report.metadata.posting_source,
                report.metadata.postings_considered
            ));
            for warning in &report.metadata.warnings {
                content.push_str(&format!("\n> Warning: {}\n", warning));
            }
        }

        Ok(content)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, 250)
    }

    pub fn with_options(use_colors: bool, preview_chars: usize) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, preview_chars),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, preview_chars),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }

    pub fn console(&self) -> &ConsoleFormatter {
        &self.console_formatter
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        JobMatcherError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })
}
