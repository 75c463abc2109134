use crate::fetcher::FetchedPage;

/// System message sent with every analysis request
pub const SYSTEM_PROMPT: &str =
    "You are an expert business analyst. Respond with valid JSON only.";

const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Joins pages into one body, each preceded by a `PAGE: <title> (<url>)` header
pub fn combine_pages(pages: &[FetchedPage]) -> String {
    pages
        .iter()
        .map(|page| format!("PAGE: {} ({})\n{}", page.title, page.url, page.text_content))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Builds the user message for a site analysis
pub fn analysis_prompt(site_url: &str, combined_content: &str) -> String {
    format!(
        r#"You are an expert business analyst specializing in Ideal Customer Profile (ICP) analysis. Analyze the following website content from {site_url} and extract comprehensive business intelligence.

WEBSITE CONTENT:
{combined_content}

Please provide a comprehensive analysis in the following JSON format:

{{
  "core_offer": "A clear, concise description of the main product/service offering",
  "industry": "Primary industry/sector this business operates in",
  "business_model": "Business model type (B2B SaaS, B2C, Marketplace, etc.)",
  "icp_summary": "2-3 sentence summary of the ideal customer profile",
  "target_personas": [
    {{
      "title": "Decision maker title (e.g., CTO, Marketing Director)",
      "company_size": "Company size this persona works at",
      "industry": "Industry this persona typically works in",
      "pain_points": ["Specific pain points this persona faces"],
      "desired_outcomes": ["What this persona wants to achieve"],
      "challenges": ["Challenges they face in achieving their goals"],
      "demographics": {{
        "seniority_level": "Junior/Mid/Senior/Executive",
        "department": "Primary department",
        "decision_making_authority": "Level of decision making power"
      }}
    }}
  ],
  "case_studies": [
    {{
      "title": "Case study title",
      "industry": "Client industry",
      "challenge": "The challenge the client faced",
      "solution": "How the company solved it",
      "results": ["Specific outcomes and benefits"],
      "metrics": "Quantifiable results if mentioned",
      "client_info": "Client company name or details if mentioned"
    }}
  ],
  "lead_magnets": [
    {{
      "title": "Lead magnet title",
      "type": "ebook|whitepaper|webinar|free_trial|demo|checklist|template|calculator",
      "description": "What the lead magnet offers",
      "target_audience": "Who it's designed for",
      "call_to_action": "The CTA used",
      "url": "URL if found"
    }}
  ],
  "competitive_advantages": ["Key differentiators and unique value propositions"],
  "tech_stack": ["Technologies mentioned or detected (programming languages, platforms, tools)"],
  "social_proof": {{
    "testimonials": [
      {{
        "quote": "Customer testimonial text",
        "author": "Customer name",
        "company": "Customer company",
        "position": "Customer job title"
      }}
    ],
    "client_logos": ["Company names mentioned as clients"],
    "metrics": [
      {{
        "metric": "Type of metric (users, savings, growth, etc.)",
        "value": "The actual value/number"
      }}
    ]
  }},
  "confidence_score": 0.85
}}

IMPORTANT GUIDELINES:
1. Extract exactly 2 target personas that represent the most likely decision makers
2. Focus on actionable insights that would help with outbound sales and marketing
3. Only include case studies, testimonials, and metrics that are explicitly mentioned
4. Be specific and detailed in pain points and desired outcomes
5. Assign a confidence score between 0 and 1 based on the quality and completeness of the information
6. If certain information is not available, use empty arrays [] or indicate "Not specified"
7. Ensure all extracted information is directly supported by the website content

Respond with valid JSON only."#
    )
}

/// Removes an optional Markdown code fence (```` ```json ```` or bare
/// ```` ``` ````) and stray backticks around a model response
pub fn strip_code_fences(response: &str) -> &str {
    let mut body = response.trim();

    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.trim_start();
        if let Some(inner) = body.trim_end().strip_suffix("```") {
            body = inner;
        }
    }

    body.trim_matches('`').trim()
}
