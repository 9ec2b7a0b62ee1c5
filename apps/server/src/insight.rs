//! # AI Insight Client
//!
//! Best-effort client for the Gemini `generateContent` REST endpoint.
//!
//! ## Failure Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The AI is a garnish, never a dependency.                               │
//! │                                                                         │
//! │  no key / network down / bad status / unparseable body                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  log a warning, return the fixed fallback string, HTTP 200.             │
//! │  The caller can NOT observe an error from this module.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use serde_json::json;
use tracing::warn;

const GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Shown when the business-insight call fails for any reason.
pub const INSIGHT_FALLBACK: &str =
    "Could not reach the AI assistant. Check that the API key is configured.";

/// Gemini REST client with a baked-in fallback policy.
pub struct InsightClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl InsightClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        InsightClient {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Management-report analysis of a month's figures. `context_json` is the
    /// serialized waterfall plus top product names.
    pub async fn business_insight(&self, context_json: &str) -> String {
        let prompt = format!(
            "Act as a senior management consultant for print shops and e-commerce.\n\
             Analyze the JSON data below and produce a concise, actionable report.\n\
             \n\
             BUSINESS DATA:\n\
             {context_json}\n\
             \n\
             Your report must contain:\n\
             1. Profitability analysis (profit vs costs).\n\
             2. Bottlenecks or critical stock levels.\n\
             3. Three practical suggestions to raise margin or cut waste.\n\
             4. A note on operational performance if the data allows it.\n\
             \n\
             Use Markdown formatting (bold, lists) for readability. Be direct."
        );

        match self.generate(prompt).await {
            Some(text) if !text.is_empty() => text,
            _ => INSIGHT_FALLBACK.to_string(),
        }
    }

    /// Marketplace listing copy for a product. Empty string on failure — the
    /// frontend simply leaves the description field blank.
    pub async fn product_description(&self, name: &str, material_names: &[String]) -> String {
        let prompt = format!(
            "Write a short, persuasive, marketplace-SEO-optimized description for a \
             print product named \"{name}\".\n\
             Materials used: {}.\n\
             Focus on quality and durability. Maximum 300 characters.",
            material_names.join(", ")
        );

        self.generate(prompt).await.unwrap_or_default()
    }

    async fn generate(&self, prompt: String) -> Option<String> {
        let Some(key) = &self.api_key else {
            warn!("no AI API key configured");
            return None;
        };

        let url = format!("{GENERATE_URL}/{}:generateContent?key={key}", self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(err) => {
                warn!(%err, "AI request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "AI request rejected");
            return None;
        }

        let parsed: GenerateResponse = match response.json().await {
            Ok(p) => p,
            Err(err) => {
                warn!(%err, "unparseable AI response");
                return None;
            }
        };

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
    }
}
