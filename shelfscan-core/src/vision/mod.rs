//! Vision Extraction Client: sends a captured frame to a multimodal model
//! and returns the raw text it reads off the image.
//!
//! Two request/response contracts are supported (see [`VisionApi`]); the
//! mapping for each lives in its own submodule so the orchestrator only
//! ever sees [`VisionExtractor`].

mod chat;
mod responses;

use crate::config::{ScanConfig, VisionApi};
use crate::error::{ConfigError, ExtractionError};
use async_trait::async_trait;

/// Instruction sent alongside every image
pub const ISBN_PROMPT: &str = r"Extract ISBN number from this image. It should match this regex /(?:ISBN(?:-13)?:?\s*)?(\d{10,13})/i";

const USER_AGENT: &str = concat!("shelfscan/", env!("CARGO_PKG_VERSION"));

/// Anything that can turn a base64 JPEG into text
#[async_trait]
pub trait VisionExtractor: Send + Sync {
    /// Submit the image once and return the model's raw text
    async fn extract_text(&self, image_base64: &str) -> Result<String, ExtractionError>;
}

fn jpeg_data_url(image_base64: &str) -> String {
    format!("data:image/jpeg;base64,{}", image_base64)
}

/// Client for an OpenAI-compatible vision endpoint
pub struct OpenAiVisionClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    api: VisionApi,
    max_tokens: u32,
}

impl OpenAiVisionClient {
    /// Build a client from configuration; fails without an API key
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_string();

        // No explicit timeout: one attempt, transport defaults apply.
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.vision_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.vision_model.clone(),
            api: config.vision_api,
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        let path = match self.api {
            VisionApi::ChatCompletions => chat::ENDPOINT,
            VisionApi::Responses => responses::ENDPOINT,
        };
        format!("{}/{}", self.base_url, path)
    }

    fn request_body(&self, image_base64: &str) -> Result<Vec<u8>, ExtractionError> {
        let body = match self.api {
            VisionApi::ChatCompletions => serde_json::to_vec(&chat::ChatRequest::new(
                &self.model,
                ISBN_PROMPT,
                image_base64,
                self.max_tokens,
            )),
            VisionApi::Responses => serde_json::to_vec(&responses::ResponsesRequest::new(
                &self.model,
                ISBN_PROMPT,
                image_base64,
                self.max_tokens,
            )),
        };
        body.map_err(|e| ExtractionError::Malformed(e.to_string()))
    }

    fn completion_text(&self, body: &[u8]) -> Result<Option<String>, serde_json::Error> {
        match self.api {
            VisionApi::ChatCompletions => chat::completion_text(body),
            VisionApi::Responses => responses::completion_text(body),
        }
    }
}

#[async_trait]
impl VisionExtractor for OpenAiVisionClient {
    async fn extract_text(&self, image_base64: &str) -> Result<String, ExtractionError> {
        let url = self.endpoint();
        let body = self.request_body(image_base64)?;

        tracing::debug!(url = %url, model = %self.model, api = ?self.api, "Requesting text extraction");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        let text = self
            .completion_text(&bytes)
            .map_err(|e| ExtractionError::Malformed(e.to_string()))?
            .ok_or(ExtractionError::MissingText)?;

        tracing::debug!(chars = text.len(), "Vision service returned text");
        Ok(text)
    }
}
