//! Business-intelligence schema returned by the completion service
//!
//! Scalar fields are required. List fields and the social-proof block
//! deserialize `null` or a missing key as empty, so a validated result never
//! carries a null list.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Treats `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured analysis of one website
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisResult {
    pub core_offer: String,
    pub industry: String,
    pub business_model: String,
    pub icp_summary: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(max = 2, message = "at most two target personas"))]
    pub target_personas: Vec<Persona>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub case_studies: Vec<CaseStudy>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub lead_magnets: Vec<LeadMagnet>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub competitive_advantages: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tech_stack: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub social_proof: SocialProof,

    /// Model-reported confidence, passed through verbatim
    #[validate(range(min = 0.0, max = 1.0, message = "confidence_score must be within [0, 1]"))]
    pub confidence_score: f64,
}

impl AnalysisResult {
    /// Scores below this are considered low-confidence by callers
    pub const LOW_CONFIDENCE: f64 = 0.3;

    pub fn is_low_confidence(&self) -> bool {
        self.confidence_score < Self::LOW_CONFIDENCE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub title: String,
    pub company_size: String,
    pub industry: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pain_points: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub desired_outcomes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub challenges: Vec<String>,
    pub demographics: Demographics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub seniority_level: String,
    pub department: String,
    pub decision_making_authority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    pub title: String,
    pub industry: String,
    pub challenge: String,
    pub solution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<String>,
}

/// Gated content offered in exchange for contact details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadMagnet {
    pub title: String,
    /// `ebook`, `whitepaper`, `webinar`, `free_trial`, `demo`, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub target_audience: String,
    pub call_to_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialProof {
    #[serde(default, deserialize_with = "null_as_default")]
    pub testimonials: Vec<Testimonial>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_logos: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<ProofMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofMetric {
    pub metric: String,
    pub value: String,
}
