//! Structured extraction of business intelligence from page content
//!
//! The engine fails loudly: short content, transport failures, unparseable
//! output and schema violations all surface as errors. It never synthesizes
//! a fallback analysis.

mod client;
mod prompt;
mod schema;

pub use client::{CompletionService, OpenAiClient};
pub use prompt::{analysis_prompt, combine_pages, strip_code_fences, SYSTEM_PROMPT};
pub use schema::{
    AnalysisResult, CaseStudy, Demographics, LeadMagnet, Persona, ProofMetric, SocialProof,
    Testimonial,
};

use crate::fetcher::FetchedPage;
use crate::{ExtractionError, PipelineError, Result};
use std::sync::Arc;
use validator::Validate;

/// Sends aggregated page content to the completion service and validates
/// the answer
pub struct ExtractionEngine {
    completion: Arc<dyn CompletionService>,
    min_content_chars: usize,
}

impl ExtractionEngine {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            min_content_chars: 100,
        }
    }

    pub fn with_min_content_chars(mut self, min: usize) -> Self {
        self.min_content_chars = min;
        self
    }

    /// Extracts an `AnalysisResult` from fetched pages
    ///
    /// # Errors
    ///
    /// * `PipelineError::NoContent` - Combined content is below the minimum;
    ///   the completion service is not called
    /// * `PipelineError::Completion` - The service call failed
    /// * `PipelineError::Extraction` - The answer was empty, not JSON, or
    ///   violated the schema
    pub async fn extract(&self, pages: &[FetchedPage], site_url: &str) -> Result<AnalysisResult> {
        let combined = combine_pages(pages);
        let combined_chars = combined.chars().count();

        if combined_chars < self.min_content_chars {
            return Err(PipelineError::NoContent(format!(
                "{} characters of content from {} pages of {} (minimum {})",
                combined_chars,
                pages.len(),
                site_url,
                self.min_content_chars
            )));
        }

        tracing::info!(
            "Requesting analysis of {} ({} pages, {} chars)",
            site_url,
            pages.len(),
            combined_chars
        );

        let prompt = analysis_prompt(site_url, &combined);
        let response = self.completion.complete(SYSTEM_PROMPT, &prompt).await?;

        let result = parse_analysis(&response)?;
        tracing::info!(
            "Analysis of {} complete (confidence {:.2})",
            site_url,
            result.confidence_score
        );
        if result.is_low_confidence() {
            tracing::warn!(
                "Low-confidence analysis for {} ({:.2})",
                site_url,
                result.confidence_score
            );
        }

        Ok(result)
    }
}

/// Parses and validates a raw model response
pub fn parse_analysis(response: &str) -> std::result::Result<AnalysisResult, ExtractionError> {
    let body = strip_code_fences(response);
    if body.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let result: AnalysisResult = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Model response is not a valid analysis: {}", e);
        ExtractionError::Parse(e)
    })?;
    result.validate()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompletionError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedCompletion {
        reply: String,
        calls: AtomicUsize,
    }

    impl ScriptedCompletion {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(
            &self,
            system_prompt: &str,
            _user_prompt: &str,
        ) -> std::result::Result<String, CompletionError> {
            assert_eq!(system_prompt, SYSTEM_PROMPT);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn pages(text: &str) -> Vec<FetchedPage> {
        vec![FetchedPage {
            url: "https://acme.test/".to_string(),
            title: "Acme".to_string(),
            text_content: text.to_string(),
            fetched_at: Utc::now(),
        }]
    }

    const VALID: &str = r#"```json
{
  "core_offer": "Industrial widgets",
  "industry": "Manufacturing",
  "business_model": "B2B",
  "icp_summary": "Plant managers.",
  "target_personas": [],
  "tech_stack": null,
  "confidence_score": 0.6
}
```"#;

    #[tokio::test]
    async fn test_extract_valid_fenced_response() {
        let completion = ScriptedCompletion::new(VALID);
        let engine = ExtractionEngine::new(completion.clone());

        let result = engine
            .extract(&pages(&"Widgets for factories. ".repeat(10)), "https://acme.test")
            .await
            .unwrap();

        assert_eq!(result.core_offer, "Industrial widgets");
        assert!(result.tech_stack.is_empty());
        assert_eq!(result.confidence_score, 0.6);
        assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_content_never_calls_service() {
        let completion = ScriptedCompletion::new(VALID);
        let engine = ExtractionEngine::new(completion.clone());

        let err = engine
            .extract(&pages("tiny"), "https://acme.test")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::NoContent(_)));
        assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_json_is_extraction_error() {
        let engine = ExtractionEngine::new(ScriptedCompletion::new("I could not analyze this site."));

        let err = engine
            .extract(&pages(&"Widgets ".repeat(30)), "https://acme.test")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Extraction(ExtractionError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_analysis_errors() {
        assert!(matches!(
            parse_analysis("```json\n```"),
            Err(ExtractionError::EmptyResponse)
        ));

        let out_of_range = VALID.replace("0.6", "7");
        assert!(matches!(
            parse_analysis(&out_of_range),
            Err(ExtractionError::Schema(_))
        ));
    }
}
