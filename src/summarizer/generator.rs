use crate::clients::request::send_json;
use crate::config::ProviderConfig;
use crate::summarizer::error::GenerationError;
use crate::utils::build_http_client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Text generation through the Gemini `generateContent` REST endpoint.
pub struct GeminiGenerator {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|part| part.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl GeminiGenerator {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        config: &ProviderConfig,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            http: build_http_client(config.request_timeout).map_err(GenerationError::HttpClient)?,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Builds a generator from the configured key, or `None` when no key is set.
    pub fn from_config(config: &ProviderConfig) -> Result<Option<Self>, GenerationError> {
        config
            .gemini_api_key
            .as_deref()
            .map(|key| Self::new(key, config.gemini_model.as_str(), config))
            .transpose()
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let request = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body);

        let parsed: GenerateResponse = send_json(request, &url).await?;
        parsed.into_text().ok_or(GenerationError::EmptyResponse)
    }
}
