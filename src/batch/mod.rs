//! Sequential batch enrichment
//!
//! Subjects are processed one at a time with a politeness delay between
//! them. Each subject gets a company enrichment and, when a profile URL is
//! present, a profile scrape; failures of either are recorded on the item
//! and never stop the run.

mod runner;
mod stats;

pub use runner::{BatchItem, BatchResult, BatchRunner, Subject};
pub use stats::{BatchStats, SourceCounter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_optional_urls() {
        let subjects: Vec<Subject> = serde_json::from_str(
            r#"[
                {"name": "Jane", "website_url": "acme.test", "linkedin_url": "https://www.linkedin.test/in/jane"},
                {"name": "Joe", "website_url": "globex.test"}
            ]"#,
        )
        .unwrap();

        assert_eq!(subjects.len(), 2);
        assert!(subjects[0].linkedin_url.is_some());
        assert_eq!(subjects[1].linkedin_url, None);
        assert_eq!(subjects[1].company_linkedin_url, None);
    }
}
