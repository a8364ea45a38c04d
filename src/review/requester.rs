//! Review requests against the generative model endpoint.

use crate::config::ReviewSettings;
use crate::domain::ReviewOutcome;
use crate::review::report::parse_report;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;
use thiserror::Error;

const GENERATIVE_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Result type for review requests.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors returned while requesting a code review.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("code must be a non-empty string")]
    EmptyCode,
    #[error("review API key is not set; export GEMINI_API_KEY or set `review.api_key`")]
    MissingApiKey,
    #[error("review request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("review endpoint returned status {status}: {body}")]
    Service { status: u16, body: String },
    #[error("review endpoint returned no candidate text")]
    EmptyResponse,
}

/// Client bound to one review model and credential.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    http: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl ReviewClient {
    /// Resolves the credential from `GEMINI_API_KEY`, falling back to the
    /// configured key. Fails fast when neither is present.
    pub fn new(settings: &ReviewSettings) -> Result<Self> {
        let api_key = match env::var("GEMINI_API_KEY") {
            Ok(value) if !value.trim().is_empty() => SecretString::from(value.trim().to_owned()),
            _ => settings
                .api_key
                .clone()
                .ok_or(ReviewError::MissingApiKey)?,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: settings.model.clone(),
        })
    }

    /// Sends the buffer snapshot for review. Network and service failures are
    /// errors; a response that is not the requested JSON shape degrades to a
    /// raw-text outcome instead.
    pub async fn analyze(&self, code: &str) -> Result<ReviewOutcome> {
        if code.trim().is_empty() {
            return Err(ReviewError::EmptyCode);
        }

        let url = format!("{GENERATIVE_API_BASE_URL}/{}:generateContent", self.model);
        let request = json!({
            "contents": [{ "parts": [{ "text": build_review_prompt(code) }] }]
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ReviewError::Service {
                status: status.as_u16(),
                body: body.trim().to_owned(),
            });
        }

        let model_text = extract_candidate_text(&body).ok_or(ReviewError::EmptyResponse)?;

        Ok(match parse_report(&model_text) {
            Some(report) => ReviewOutcome::Report(report),
            None => ReviewOutcome::Raw(model_text),
        })
    }
}

/// Builds the fixed reviewer prompt asking for JSON-only output.
pub fn build_review_prompt(code: &str) -> String {
    format!(
        "You are a strict code reviewer. Given the user's source code between triple \
         backticks, find any errors (syntax, runtime, or clear logical bugs) and return a \
         SINGLE valid JSON object ONLY with the exact shape:\n\
         {{\"issues\": [ {{\"type\": string, \"line\": number|null, \"excerpt\": string, \
         \"explanation\": string, \"suggestion\": string }} ], \"summary\": string }}\n\
         If there are no problems, return {{\"issues\": [], \"summary\": \"No problems found.\"}}.\n\
         User code:\n\n```\n{code}\n```\nRespond with valid JSON only."
    )
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_candidate_text(body: &str) -> Option<String> {
    let response: GenerateContentResponse = serde_json::from_str(body).ok()?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("\n")
        })?;

    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::{ReviewClient, ReviewError, build_review_prompt, extract_candidate_text};
    use secrecy::SecretString;
    use std::time::Duration;

    fn client() -> ReviewClient {
        ReviewClient {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(1))
                .build()
                .unwrap(),
            api_key: SecretString::from("test-key".to_owned()),
            model: "gemini-2.5-flash".to_owned(),
        }
    }

    #[tokio::test]
    async fn empty_code_is_rejected_before_any_network_call() {
        let error = client().analyze("   \n ").await.unwrap_err();
        assert!(matches!(error, ReviewError::EmptyCode));
    }

    #[test]
    fn prompt_embeds_the_code_and_demands_json() {
        let prompt = build_review_prompt("let x = 1;");
        assert!(prompt.contains("```\nlet x = 1;\n```"));
        assert!(prompt.contains("Respond with valid JSON only."));
    }

    #[test]
    fn candidate_text_joins_first_candidate_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "{\"issues\"" }, { "text": ": []}" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;

        assert_eq!(
            extract_candidate_text(body).as_deref(),
            Some("{\"issues\"\n: []}")
        );
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        assert!(extract_candidate_text(r#"{"candidates": []}"#).is_none());
        assert!(extract_candidate_text("not json").is_none());
    }
}
