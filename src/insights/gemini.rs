use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ContentInsights;
use super::parsing::parse_insights_json;

/// Characters of document text included in the prompt.
const PROMPT_TEXT_LIMIT: usize = 4000;

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        if api_key.is_empty() {
            anyhow::bail!("Gemini API key is required. Set GEMINI_API_KEY environment variable.");
        }

        Ok(Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Ask the model to describe the given document text as content
    /// insights. The raw response is parsed leniently; malformed output
    /// becomes an empty [`ContentInsights`].
    pub async fn generate_insights(&self, text: &str) -> Result<ContentInsights> {
        let response = self.complete(&insights_prompt(text)).await?;
        Ok(parse_insights_json(&response))
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.6,
                max_output_tokens: 512,
            },
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let response: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        if let Some(error) = response.error {
            anyhow::bail!("Gemini API error: {}", error.message);
        }

        response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .context("No content in Gemini response")
    }
}

fn insights_prompt(text: &str) -> String {
    format!(
        "Return only JSON.\n\
         Analyze the text below and produce:\n\
         - caption (string)\n\
         - hashtags (array of 7-10 strings starting with #, lowercase)\n\
         - suggestions (exactly 10 short actionable strings)\n\
         - tone (positive|neutral|negative)\n\
         - confidence (0-1 number)\n\
         \n\
         Text:\n\
         {}",
        truncate_chars(text, PROMPT_TEXT_LIMIT)
    )
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_requires_api_key() {
        assert!(GeminiProvider::new("", "gemini-1.5-flash").is_err());
        assert!(GeminiProvider::new("key", "gemini-1.5-flash").is_ok());
    }

    #[test]
    fn test_prompt_names_every_field() {
        let prompt = insights_prompt("some document text");
        for field in ["caption", "hashtags", "suggestions", "tone", "confidence"] {
            assert!(prompt.contains(field), "prompt missing {field}");
        }
        assert!(prompt.contains("some document text"));
    }

    #[test]
    fn test_prompt_truncates_long_text() {
        let long = "x".repeat(PROMPT_TEXT_LIMIT + 500);
        let prompt = insights_prompt(&long);
        let tail = prompt.rsplit("Text:\n").next().unwrap_or_default();
        assert_eq!(tail.chars().count(), PROMPT_TEXT_LIMIT);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 4), "éééé");
        assert_eq!(truncate_chars("short", 4000), "short");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.6,
                max_output_tokens: 512,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("generationConfig").is_some());
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
    }
}
