use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::groups::GroupSpec;
use crate::pdf::text::PageText;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const PROMPT: &str = "\
Analyze the following text extracted from a PDF document page by page. \
Identify the start and end pages of logical chapters, sections, or parts \
based on headings (e.g., \"Chapter 1\", \"Introduction\", \"Index\").

Rules:
1. Create a logical grouping of the document.
2. Groups should not overlap (unless necessary for context).
3. Return a clean list of groups.
4. Group names should be descriptive (e.g., \"Chapter 1: The Beginning\").
5. The 'range' field must be a valid page range string (e.g., \"1-5\", \"6-10\", \"11, 13\").";

/// Ask the model to propose chapter groups for the given per-page text.
///
/// The returned specs are untrusted input: callers run them through the same
/// parsing and validation as user-entered groups.
pub async fn suggest_groups(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    pages: &[PageText],
) -> Result<Vec<GroupSpec>> {
    let page_context = pages
        .iter()
        .map(|p| format!("[Page {}]: {}", p.page, p.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    let body = json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": PROMPT },
                { "text": page_context },
            ],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "range": { "type": "STRING" },
                    },
                    "required": ["name", "range"],
                },
            },
        },
    });

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
    );
    debug!(%model, pages = pages.len(), "requesting chapter suggestions");

    let response: GenerateContentResponse = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await
        .context("Chapter suggestion request failed")?
        .error_for_status()
        .context("Chapter suggestion request rejected")?
        .json()
        .await
        .context("Malformed chapter suggestion response")?;

    extract_suggestions(response)
}

fn extract_suggestions(response: GenerateContentResponse) -> Result<Vec<GroupSpec>> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<String>()
        })
        .ok_or_else(|| anyhow!("Model returned no candidates"))?;

    serde_json::from_str(&text).context("Model returned an unparsable group list")
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}
