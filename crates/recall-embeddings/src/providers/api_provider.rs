//! Cloud API embedding provider.
//!
//! Async HTTP client for OpenAI-compatible `/embeddings` endpoints. Maps
//! HTTP 429 and quota responses onto the rate-limit errors the embedder
//! recovers from; everything else is reported as a request failure.

use std::time::Duration;

use async_trait::async_trait;
use recall_core::errors::ProviderError;
use recall_core::traits::{EmbedMode, IEmbeddingProvider};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI-compatible embedding API provider.
pub struct ApiEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
    timeout: Duration,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
    /// Asymmetric models (Voyage, Jina) read this; others ignore it.
    input_type: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl ApiEmbeddingProvider {
    /// Create a new API provider. `timeout` bounds every HTTP request.
    pub fn new(
        endpoint: Option<String>,
        model: String,
        api_key: String,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request {
                provider: model.clone(),
                reason: format!("client build failed: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model,
            api_key,
            dimensions,
            timeout,
        })
    }

    fn request_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                provider: self.model.clone(),
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ProviderError::Request {
                provider: self.model.clone(),
                reason: format!("HTTP error: {e}"),
            }
        }
    }

    fn invalid(&self, reason: String) -> ProviderError {
        ProviderError::InvalidResponse {
            provider: self.model.clone(),
            reason,
        }
    }
}

/// Classify a non-success HTTP response.
///
/// Quota exhaustion is only recognised on 402, 403 and 429 responses, so a
/// validation error that merely mentions a quota field stays a hard failure.
pub fn classify_status(provider: &str, status: StatusCode, body: &str) -> ProviderError {
    let quota_status = matches!(
        status,
        StatusCode::PAYMENT_REQUIRED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );
    if quota_status && body.to_lowercase().contains("quota") {
        ProviderError::QuotaExceeded {
            provider: provider.to_string(),
        }
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited {
            provider: provider.to_string(),
        }
    } else {
        ProviderError::Request {
            provider: provider.to_string(),
            reason: format!("API returned {status}: {body}"),
        }
    }
}

#[async_trait]
impl IEmbeddingProvider for ApiEmbeddingProvider {
    async fn embed_many(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(model = %self.model, count = texts.len(), mode = mode.as_str(), "embedding request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
                dimensions: self.dimensions,
                input_type: mode.as_str(),
            })
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(&self.model, status, &body));
        }

        let resp: EmbedResponse = response
            .json()
            .await
            .map_err(|e| self.invalid(format!("JSON parse error: {e}")))?;

        if resp.data.len() != texts.len() {
            return Err(self.invalid(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                resp.data.len()
            )));
        }

        let mut data = resp.data;
        data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}
