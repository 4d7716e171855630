//! Gemini `generateContent` client - the visual generation request pipeline.
//!
//! One call per user action: prompt text plus an optional reference image in,
//! exactly one decoded image out, or a classified failure. Nothing is cached
//! and nothing is retried.

use crate::error::{EduVizError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.5 Flash Image preview (free-tier image generation).
    #[default]
    FlashImagePreview,
    /// Gemini 2.5 Flash Image (stable).
    FlashImage,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashImagePreview => "gemini-2.5-flash-image-preview",
            Self::FlashImage => "gemini-2.5-flash-image",
        }
    }
}

/// Builder for [`GeminiClient`].
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    model: GeminiModel,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Builds the client, resolving the API key.
    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                EduVizError::Auth("GOOGLE_API_KEY not set and no API key provided".into())
            })?;

        Ok(GeminiClient {
            client: reqwest::Client::new(),
            api_key,
            model: self.model,
        })
    }
}

/// Gemini image generation client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: GeminiModel,
}

impl GeminiClient {
    /// Creates a new `GeminiClientBuilder`.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        request.validate()?;
        let start = Instant::now();

        let url = format!("{}/{}:generateContent", API_BASE, self.model.as_str());
        let body = GeminiRequest::from_generation_request(request);

        tracing::debug!(
            model = self.model.as_str(),
            has_reference = request.has_reference(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status.as_u16(), &text, &headers));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let inline = extract_inline_data(gemini_response)?;

        let data = base64::engine::general_purpose::STANDARD
            .decode(&inline.data)
            .map_err(|e| EduVizError::Decode(e.to_string()))?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(duration_ms, size = data.len(), "image generated");

        // Format comes from the payload's magic bytes; the response mime
        // string is not always accurate
        GeneratedImage::from_bytes(
            data,
            request.prompt.clone(),
            GenerationMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
            },
        )
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        self.generate_impl(request).await
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/{}", API_BASE, self.model.as_str());

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(EduVizError::Auth("Invalid API key".into())),
            404 => Err(EduVizError::Api {
                status: 404,
                message: "Model not found. Verify the model name is correct.".into(),
            }),
            s if !(200..300).contains(&s) => Err(EduVizError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

/// Maps a non-2xx HTTP reply to the error taxonomy.
fn classify_http_error(
    status: u16,
    text: &str,
    headers: &reqwest::header::HeaderMap,
) -> EduVizError {
    let text = sanitize_error_message(text);
    if status == 429 {
        let retry_after = parse_retry_after(headers).map(Duration::from_secs);
        return EduVizError::Quota { retry_after };
    }
    if status == 401 || status == 403 {
        return EduVizError::Auth(text);
    }
    let lower = text.to_lowercase();
    if lower.contains("quota") || lower.contains("resource_exhausted") {
        return EduVizError::Quota { retry_after: None };
    }
    if lower.contains("safety") || lower.contains("blocked") || lower.contains("prohibited") {
        return EduVizError::ContentBlocked(text);
    }
    EduVizError::Api {
        status,
        message: text,
    }
}

/// Pulls the single image payload out of a successful response.
///
/// The service may return several candidates and text commentary alongside the
/// image; only the first candidate's first inline image is used. A 200 with no
/// image payload is a failure, never an empty success.
fn extract_inline_data(response: GeminiResponse) -> Result<InlineData> {
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let msg = feedback
                .block_reason_message
                .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
            return Err(EduVizError::ContentBlocked(msg));
        }
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| EduVizError::EmptyResponse("No candidates in response".into()))?;

    if let Some(ref finish_reason) = candidate.finish_reason {
        match finish_reason.as_str() {
            "SAFETY" | "IMAGE_SAFETY" | "IMAGE_PROHIBITED_CONTENT" | "RECITATION"
            | "IMAGE_RECITATION" | "PROHIBITED_CONTENT" | "BLOCKLIST" => {
                return Err(EduVizError::ContentBlocked(format!(
                    "Blocked by safety filter: {}",
                    finish_reason
                )));
            }
            _ => {} // STOP, MAX_TOKENS, etc. are normal
        }
    }

    candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or_else(|| EduVizError::EmptyResponse("No image data in response parts".into()))
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Strips the API key query parameter if the service echoes the request URL.
fn sanitize_error_message(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(no error body)".into();
    }
    match trimmed.find("key=") {
        Some(idx) => {
            let end = trimmed[idx..]
                .find(|c: char| c == '&' || c.is_whitespace())
                .map(|e| idx + e)
                .unwrap_or(trimmed.len());
            format!("{}key=REDACTED{}", &trimmed[..idx], &trimmed[end..])
        }
        None => trimmed.to_string(),
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - either text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text { text: String },
    InlineData { inline_data: GeminiInlineData },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        let mut parts = vec![GeminiRequestPart::Text {
            text: req.prompt.clone(),
        }];

        // Reference image follows the instruction text
        if let Some(ref image_data) = req.reference_image {
            let mime_type = ImageFormat::from_magic_bytes(image_data)
                .map(|f| f.mime_type())
                .unwrap_or("image/jpeg")
                .to_string();

            parts.push(GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type,
                    data: base64::engine::general_purpose::STANDARD.encode(image_data),
                },
            });
        }

        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}
