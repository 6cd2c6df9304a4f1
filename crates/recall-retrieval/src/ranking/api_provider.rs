//! Cohere/Jina-style HTTP rerank provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use recall_core::config::RerankConfig;
use recall_core::errors::ProviderError;
use recall_core::models::RerankResult;
use recall_core::traits::IRerankProvider;
use recall_embeddings::providers::classify_status;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.cohere.com/v2/rerank";

pub struct ApiRerankProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankItem>,
}

#[derive(Deserialize)]
struct RerankItem {
    index: usize,
    relevance_score: f32,
}

impl ApiRerankProvider {
    pub fn new(
        endpoint: Option<String>,
        model: String,
        api_key: String,
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
            timeout,
        })
    }
}

#[async_trait]
impl IRerankProvider for ApiRerankProvider {
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>, ProviderError> {
        debug!(model = %self.model, documents = documents.len(), top_n, "rerank request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&RerankRequest {
                model: &self.model,
                query,
                documents,
                top_n,
            })
            .send()
            .await
            .map_err(|e| {
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
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(&self.model, status, &body));
        }

        let resp: RerankResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: self.model.clone(),
                    reason: format!("JSON parse error: {e}"),
                })?;

        Ok(resp
            .results
            .into_iter()
            .map(|r| RerankResult {
                index: r.index,
                relevance_score: r.relevance_score,
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Build the configured rerank provider, or `None` for provider "none"
/// or a provider that cannot be configured.
pub fn create_rerank_provider(config: &RerankConfig) -> Option<Arc<dyn IRerankProvider>> {
    match config.provider.as_str() {
        "api" => {
            let Some(env) = config.api_key_env.as_deref() else {
                warn!("rerank API configured without api_key_env; re-ranking disabled");
                return None;
            };
            let Ok(api_key) = std::env::var(env) else {
                warn!(env, "rerank API key variable not set; re-ranking disabled");
                return None;
            };
            match ApiRerankProvider::new(
                config.endpoint.clone(),
                config.model.clone(),
                api_key,
                Duration::from_millis(config.timeout_ms),
            ) {
                Ok(p) => {
                    info!(model = %config.model, "rerank provider ready");
                    Some(Arc::new(p))
                }
                Err(e) => {
                    warn!(error = %e, "rerank provider failed to initialize");
                    None
                }
            }
        }
        "none" => None,
        other => {
            warn!(provider = other, "unknown rerank provider, re-ranking disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_cohere_shape() {
        let body = r#"{"id":"x","results":[{"index":1,"relevance_score":0.91},{"index":0,"relevance_score":0.12}],"meta":{}}"#;
        let resp: RerankResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[0].index, 1);
    }

    #[test]
    fn none_provider_disables_reranking() {
        assert!(create_rerank_provider(&RerankConfig::default()).is_none());
    }

    #[test]
    fn missing_key_env_disables_reranking() {
        let config = RerankConfig {
            provider: "api".to_string(),
            api_key_env: Some("RECALL_TEST_RERANK_KEY_THAT_IS_NOT_SET".to_string()),
            ..Default::default()
        };
        assert!(create_rerank_provider(&config).is_none());
    }
}
