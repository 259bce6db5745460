//! Built-in catalog of sample postings

use crate::processing::document::{
    JobPosting, ATTR_EMPLOYMENT_TYPE, ATTR_LOCATION, ATTR_SALARY_RANGE,
};
use crate::sources::{FetchOutcome, JobQuery, JobSource};
use regex::Regex;
use std::sync::OnceLock;

struct CatalogRow {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    job_type: &'static str,
    description: &'static str,
    skills: &'static str,
    salary_range: &'static str,
}

const ROWS: &[CatalogRow] = &[
    CatalogRow {
        title: "Senior Data Scientist",
        company: "TechCorp",
        location: "San Francisco",
        job_type: "Full-time",
        description: "Looking for experienced data scientist with Python, machine learning, and statistical analysis skills. Work on predictive models and data pipelines.",
        skills: "Python, Machine Learning, Statistics, SQL, Data Visualization",
        salary_range: "$120k - $180k",
    },
    CatalogRow {
        title: "Machine Learning Engineer",
        company: "AI Innovations",
        location: "New York",
        job_type: "Full-time",
        description: "Build and deploy ML models at scale. Required: Python, TensorFlow, PyTorch, AWS. Experience with NLP and computer vision preferred.",
        skills: "Python, TensorFlow, PyTorch, Machine Learning, AWS, NLP",
        salary_range: "$130k - $190k",
    },
    CatalogRow {
        title: "Software Developer",
        company: "CodeWorks",
        location: "Austin",
        job_type: "Full-time",
        description: "Develop robust software solutions using Java, Python, or C++. Strong problem-solving and algorithm design skills required.",
        skills: "Java, Python, C++, Algorithms, Data Structures, Problem Solving",
        salary_range: "$90k - $140k",
    },
    CatalogRow {
        title: "Full Stack Developer",
        company: "WebSolutions",
        location: "Seattle",
        job_type: "Contract",
        description: "Create responsive web applications using React, Node.js, and MongoDB. Experience with modern JavaScript frameworks essential.",
        skills: "React, Node.js, JavaScript, MongoDB, HTML, CSS",
        salary_range: "$80k - $120k",
    },
    CatalogRow {
        title: "Data Analyst",
        company: "DataHub",
        location: "Boston",
        job_type: "Full-time",
        description: "Analyze business data, create dashboards, and provide actionable insights. Proficiency in SQL, Excel, and Tableau required.",
        skills: "SQL, Excel, Tableau, Data Analysis, Statistics",
        salary_range: "$70k - $110k",
    },
    CatalogRow {
        title: "Business Intelligence Analyst",
        company: "Analytics Pro",
        location: "Chicago",
        job_type: "Full-time",
        description: "Design BI solutions and reports using Power BI or Tableau. Strong SQL and data warehousing knowledge needed.",
        skills: "Power BI, Tableau, SQL, Data Warehousing, ETL",
        salary_range: "$75k - $115k",
    },
    CatalogRow {
        title: "DevOps Engineer",
        company: "CloudTech",
        location: "Denver",
        job_type: "Full-time",
        description: "Manage CI/CD pipelines, Docker, Kubernetes. Experience with AWS, Azure, or GCP. Automate infrastructure and deployments.",
        skills: "Docker, Kubernetes, AWS, CI/CD, Linux, Automation",
        salary_range: "$110k - $160k",
    },
    CatalogRow {
        title: "Cloud Solutions Architect",
        company: "ScaleSystems",
        location: "San Francisco",
        job_type: "Full-time",
        description: "Design scalable cloud architectures on AWS or Azure. Certifications preferred. Experience with microservices and serverless.",
        skills: "AWS, Azure, Cloud Architecture, Microservices, Serverless",
        salary_range: "$140k - $200k",
    },
    CatalogRow {
        title: "Frontend Developer",
        company: "DesignLab",
        location: "Los Angeles",
        job_type: "Contract",
        description: "Build beautiful user interfaces with React, Vue, or Angular. Strong CSS, HTML5, and responsive design skills required.",
        skills: "React, Vue, Angular, HTML5, CSS3, JavaScript, Responsive Design",
        salary_range: "$85k - $130k",
    },
    CatalogRow {
        title: "Backend Developer",
        company: "ServerMasters",
        location: "Austin",
        job_type: "Full-time",
        description: "Develop server-side applications using Node.js, Python, or Java. Experience with RESTful APIs and databases essential.",
        skills: "Node.js, Python, Java, REST API, SQL, NoSQL",
        salary_range: "$95k - $145k",
    },
    CatalogRow {
        title: "AI Research Scientist",
        company: "ResearchAI",
        location: "Boston",
        job_type: "Full-time",
        description: "Conduct cutting-edge AI research. PhD preferred. Publications in top-tier conferences. Deep learning and reinforcement learning expertise.",
        skills: "Deep Learning, PyTorch, TensorFlow, Research, NLP, Computer Vision",
        salary_range: "$150k - $220k",
    },
    CatalogRow {
        title: "Product Manager",
        company: "ProductCo",
        location: "New York",
        job_type: "Full-time",
        description: "Define product strategy and roadmap. Work with engineering and design teams. Strong communication and analytical skills required.",
        skills: "Product Strategy, Agile, Communication, Analytics, Leadership",
        salary_range: "$120k - $170k",
    },
    CatalogRow {
        title: "UX Designer",
        company: "CreativeStudio",
        location: "San Francisco",
        job_type: "Full-time",
        description: "Create intuitive user experiences. Proficiency in Figma, Sketch, or Adobe XD. Conduct user research and usability testing.",
        skills: "Figma, Sketch, Adobe XD, User Research, Prototyping, Wireframing",
        salary_range: "$80k - $120k",
    },
    CatalogRow {
        title: "Digital Marketing Specialist",
        company: "MarketingPlus",
        location: "Chicago",
        job_type: "Part-time",
        description: "Plan and execute digital marketing campaigns. SEO, SEM, social media marketing experience. Analytics and content creation skills.",
        skills: "SEO, SEM, Google Analytics, Social Media, Content Marketing",
        salary_range: "$60k - $90k",
    },
    CatalogRow {
        title: "Cybersecurity Analyst",
        company: "SecureNet",
        location: "Washington DC",
        job_type: "Full-time",
        description: "Protect systems from cyber threats. Experience with penetration testing, security audits, and incident response required.",
        skills: "Security, Penetration Testing, Network Security, Incident Response",
        salary_range: "$100k - $150k",
    },
    CatalogRow {
        title: "Systems Administrator",
        company: "ITManage",
        location: "Seattle",
        job_type: "Full-time",
        description: "Maintain IT infrastructure and servers. Linux/Windows administration. Network configuration and troubleshooting skills needed.",
        skills: "Linux, Windows Server, Networking, Troubleshooting, Active Directory",
        salary_range: "$70k - $110k",
    },
    CatalogRow {
        title: "Database Administrator",
        company: "DatabasePro",
        location: "Austin",
        job_type: "Full-time",
        description: "Manage and optimize databases. Experience with MySQL, PostgreSQL, or MongoDB. Performance tuning and backup strategies.",
        skills: "MySQL, PostgreSQL, MongoDB, Database Design, Performance Tuning",
        salary_range: "$85k - $135k",
    },
    CatalogRow {
        title: "Mobile App Developer",
        company: "MobileFirst",
        location: "San Francisco",
        job_type: "Contract",
        description: "Develop iOS and Android applications. Experience with Swift, Kotlin, or React Native. Strong UI/UX sensibility required.",
        skills: "Swift, Kotlin, React Native, iOS, Android, Mobile UI/UX",
        salary_range: "$95k - $145k",
    },
    CatalogRow {
        title: "Quality Assurance Engineer",
        company: "QualityFirst",
        location: "Denver",
        job_type: "Full-time",
        description: "Ensure software quality through testing. Automation testing experience with Selenium or similar tools. Detail-oriented mindset.",
        skills: "Selenium, Testing, QA Automation, Python, Java, Bug Tracking",
        salary_range: "$80k - $125k",
    },
    CatalogRow {
        title: "Technical Writer",
        company: "DocuTech",
        location: "Remote",
        job_type: "Remote",
        description: "Write technical documentation and user guides. Strong writing skills and ability to explain complex concepts clearly required.",
        skills: "Technical Writing, Documentation, Communication, API Documentation",
        salary_range: "$65k - $100k",
    },
];

/// Parse a range like `$120k - $180k` into annual amounts
pub fn parse_salary_range(range: &str) -> Option<(u32, u32)> {
    static SALARY_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SALARY_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\$?\s*(\d+(?:\.\d+)?)\s*(k?)\s*-\s*\$?\s*(\d+(?:\.\d+)?)\s*(k?)")
            .expect("Invalid salary regex")
    });

    let captures = regex.captures(range)?;
    let amount = |value: &str, suffix: &str| -> Option<u32> {
        let value: f64 = value.parse().ok()?;
        let multiplier = if suffix.is_empty() { 1.0 } else { 1000.0 };
        Some((value * multiplier).round() as u32)
    };

    let min = amount(&captures[1], &captures[2])?;
    let max = amount(&captures[3], &captures[4])?;
    Some((min.min(max), min.max(max)))
}

/// Postings bundled with the application
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    postings: Vec<JobPosting>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticCatalog {
    pub fn new() -> Self {
        let postings = ROWS
            .iter()
            .enumerate()
            .map(|(i, row)| {
                JobPosting::new((i + 1).to_string(), row.title, row.description)
                    .with_skills(row.skills.split(", "))
                    .with_company(row.company)
                    .with_attribute(ATTR_LOCATION, row.location)
                    .with_attribute(ATTR_EMPLOYMENT_TYPE, row.job_type)
                    .with_attribute(ATTR_SALARY_RANGE, row.salary_range)
            })
            .collect();
        Self { postings }
    }

    pub fn from_postings(postings: Vec<JobPosting>) -> Self {
        Self { postings }
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    /// Distinct values of an attribute, sorted, for filter menus
    pub fn attribute_values(&self, key: &str) -> Vec<String> {
        let mut values: Vec<String> = self
            .postings
            .iter()
            .flat_map(|p| p.attribute(key).iter().cloned())
            .collect();
        values.sort();
        values.dedup();
        values
    }

    /// Location, employment type and salary criteria; keywords are left to the ranker
    fn matches(posting: &JobPosting, query: &JobQuery) -> bool {
        let attribute_matches = |key: &str, wanted: &Option<String>| match wanted {
            Some(wanted) => posting
                .attribute(key)
                .iter()
                .any(|value| value.eq_ignore_ascii_case(wanted.trim())),
            None => true,
        };

        if !attribute_matches(ATTR_LOCATION, &query.location)
            || !attribute_matches(ATTR_EMPLOYMENT_TYPE, &query.employment_type)
        {
            return false;
        }

        if query.min_salary.is_none() && query.max_salary.is_none() {
            return true;
        }
        match posting.primary_attribute(ATTR_SALARY_RANGE).and_then(parse_salary_range) {
            Some((low, high)) => {
                query.min_salary.map_or(true, |min| high >= min)
                    && query.max_salary.map_or(true, |max| low <= max)
            }
            None => false,
        }
    }
}

impl JobSource for StaticCatalog {
    fn name(&self) -> &'static str {
        "static catalog"
    }

    async fn fetch(&self, query: &JobQuery) -> FetchOutcome {
        let postings = self
            .postings
            .iter()
            .filter(|p| Self::matches(p, query))
            .cloned()
            .collect();
        FetchOutcome::postings(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        let catalog = StaticCatalog::new();

        assert_eq!(catalog.postings().len(), 20);
        let first = &catalog.postings()[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.title, "Senior Data Scientist");
        assert_eq!(first.skills.len(), 5);
        assert_eq!(first.primary_attribute(ATTR_LOCATION), Some("San Francisco"));
    }

    #[test]
    fn test_salary_parsing() {
        assert_eq!(parse_salary_range("$120k - $180k"), Some((120_000, 180_000)));
        assert_eq!(parse_salary_range("$65K-$100K"), Some((65_000, 100_000)));
        assert_eq!(parse_salary_range("45000 - 52000"), Some((45_000, 52_000)));
        assert_eq!(parse_salary_range("competitive"), None);
    }

    #[test]
    fn test_attribute_values() {
        let catalog = StaticCatalog::new();
        let types = catalog.attribute_values(ATTR_EMPLOYMENT_TYPE);

        assert_eq!(types, vec!["Contract", "Full-time", "Part-time", "Remote"]);
    }

    #[tokio::test]
    async fn test_fetch_filters() {
        let catalog = StaticCatalog::new();

        let austin = catalog
            .fetch(&JobQuery {
                location: Some("austin".to_string()),
                ..JobQuery::default()
            })
            .await;
        assert_eq!(austin.postings.len(), 3);
        assert!(austin.warning.is_none());

        let well_paid = catalog
            .fetch(&JobQuery {
                min_salary: Some(190_000),
                ..JobQuery::default()
            })
            .await;
        let titles: Vec<&str> = well_paid.postings.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Machine Learning Engineer", "Cloud Solutions Architect", "AI Research Scientist"]
        );

        let everything = catalog.fetch(&JobQuery::default()).await;
        assert_eq!(everything.postings.len(), 20);
    }
}
