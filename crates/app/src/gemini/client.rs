//! Gemini API client for snowman analysis and sticker generation.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use snowdex_core::{AnalysisResult, ImageData, SnowmanStats};

use crate::config::GeminiConfig;

use super::SnowmanGateway;
use super::error::{ApiErrorResponse, GeminiError};
use super::prompt::{ANALYSIS_PROMPT, STICKER_ASPECT_RATIO, STICKER_PROMPT, analysis_schema};
use super::types::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig, RawAnalysis,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    base_url: String,
    analysis_model: String,
    sticker_model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::Unauthorized` if the API key cannot be sent as a
    /// header, or `GeminiError::Http` if the HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret()).map_err(|_| {
            GeminiError::Unauthorized("API key contains invalid header characters".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                analysis_model: config.analysis_model.clone(),
                sticker_model: config.sticker_model.clone(),
            }),
        })
    }

    /// Endpoint for `generateContent` on the given model.
    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.inner.base_url)
    }

    /// Send a `generateContent` request and decode the response.
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(model))
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle a response, decoding the body on success.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return GeminiError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return GeminiError::Unauthorized("Invalid API key".to_string());
        }

        // Try to parse API error response
        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    GeminiError::Api {
                        status: api_error.error.status,
                        message: api_error.error.message,
                    }
                } else {
                    GeminiError::Api {
                        status: status.to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => GeminiError::Http(e),
        }
    }
}

impl SnowmanGateway for GeminiClient {
    #[instrument(skip(self, image), fields(model = %self.inner.analysis_model, bytes = image.len()))]
    async fn analyze(&self, image: &ImageData) -> Result<AnalysisResult, GeminiError> {
        let request = GenerateContentRequest::image_with_prompt(image, ANALYSIS_PROMPT)
            .with_config(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(analysis_schema()),
                ..GenerationConfig::default()
            });

        let response = self.generate(&self.inner.analysis_model, &request).await?;
        let text = response.text().ok_or(GeminiError::EmptyResponse)?;
        let analysis = parse_analysis(&text)?;

        tracing::info!(name = %analysis.name, rarity = %analysis.rarity, "Snowman analyzed");
        Ok(analysis)
    }

    #[instrument(skip(self, image), fields(model = %self.inner.sticker_model))]
    async fn generate_sticker(&self, image: &ImageData) -> Result<Option<ImageData>, GeminiError> {
        let request = GenerateContentRequest::image_with_prompt(image, STICKER_PROMPT)
            .with_config(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: STICKER_ASPECT_RATIO.to_string(),
                }),
                ..GenerationConfig::default()
            });

        let response = self.generate(&self.inner.sticker_model, &request).await?;
        parse_sticker(&response)
    }
}

/// Parse and validate the model's analysis JSON.
///
/// Missing or mistyped fields, unknown rarities and blank names are rejected.
/// Stats outside `1..=100` are clamped, with a warning per adjusted stat.
pub(crate) fn parse_analysis(text: &str) -> Result<AnalysisResult, GeminiError> {
    let raw: RawAnalysis = serde_json::from_str(text.trim())
        .map_err(|e| GeminiError::Parse(format!("Invalid analysis payload: {e}")))?;

    let name = raw.name.trim();
    if name.is_empty() {
        return Err(GeminiError::Parse("Analysis returned an empty name".to_string()));
    }

    let (stats, adjusted) = SnowmanStats::clamped(raw.stats);
    for kind in adjusted {
        tracing::warn!(stat = %kind, value = stats.get(kind), "Stat out of range, clamped");
    }

    Ok(AnalysisResult {
        name: name.to_string(),
        description: raw.description,
        kind: raw.kind,
        rarity: raw.rarity,
        stats,
        fun_fact: raw.fun_fact,
    })
}

/// Extract the sticker image, if the model produced one.
pub(crate) fn parse_sticker(
    response: &GenerateContentResponse,
) -> Result<Option<ImageData>, GeminiError> {
    let Some(inline) = response.inline_image() else {
        tracing::debug!("No image part in sticker response");
        return Ok(None);
    };

    ImageData::from_base64(inline.mime_type.as_str(), &inline.data)
        .map(Some)
        .map_err(|e| GeminiError::Parse(format!("Invalid sticker payload: {e}")))
}
