//! Job posting structures shared by the sources and the ranking core

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known attribute keys
pub const ATTR_LOCATION: &str = "location";
pub const ATTR_EMPLOYMENT_TYPE: &str = "employment_type";
pub const ATTR_SALARY_RANGE: &str = "salary_range";
pub const ATTR_CATEGORY: &str = "category";

/// A job posting. Attributes are only used for filtering and display, never for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl JobPosting {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            skills: Vec::new(),
            company: None,
            url: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Append a value to a categorical attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.entry(key.into()).or_default().push(value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> &[String] {
        self.attributes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of an attribute, for display
    pub fn primary_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).first().map(String::as_str)
    }

    /// Text fed to the vectorizer: title, body and skills
    pub fn scoring_text(&self) -> String {
        let mut text = String::with_capacity(self.title.len() + self.body.len() + 64);
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.body);
        if !self.skills.is_empty() {
            text.push(' ');
            text.push_str(&self.skills.join(", "));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_text_combines_fields() {
        let posting = JobPosting::new("1", "Data Scientist", "Build predictive models.")
            .with_skills(["Python", "SQL"]);

        assert_eq!(posting.scoring_text(), "Data Scientist Build predictive models. Python, SQL");
    }

    #[test]
    fn test_scoring_text_without_skills() {
        let posting = JobPosting::new("2", "Chef", "cooking recipes kitchen");
        assert_eq!(posting.scoring_text(), "Chef cooking recipes kitchen");
    }

    #[test]
    fn test_multi_valued_attributes() {
        let posting = JobPosting::new("3", "Analyst", "dashboards")
            .with_attribute(ATTR_LOCATION, "Canada")
            .with_attribute(ATTR_LOCATION, "Calgary");

        assert_eq!(posting.attribute(ATTR_LOCATION), ["Canada", "Calgary"]);
        assert_eq!(posting.primary_attribute(ATTR_LOCATION), Some("Canada"));
        assert!(posting.attribute(ATTR_EMPLOYMENT_TYPE).is_empty());
    }
}
