//! Provider registry.
//!
//! 1. API (cloud, configured with an endpoint and key)
//! 2. Hashed fallback (always available, lowest quality)

pub mod api_provider;
pub mod hashed_fallback;

pub use api_provider::{classify_status, ApiEmbeddingProvider};
pub use hashed_fallback::HashedFallback;

use std::sync::Arc;
use std::time::Duration;

use recall_core::config::EmbeddingConfig;
use recall_core::traits::IEmbeddingProvider;
use tracing::{info, warn};

/// Build the configured primary provider.
///
/// Returns `None` when the embedder should run on the hashed fallback
/// alone, either by choice or because the primary cannot be configured.
pub fn create_primary(config: &EmbeddingConfig) -> Option<Arc<dyn IEmbeddingProvider>> {
    match config.provider.as_str() {
        "api" => {
            let Some(env) = config.api_key_env.as_deref() else {
                warn!("API provider configured without api_key_env; using hashed fallback");
                return None;
            };
            let Ok(api_key) = std::env::var(env) else {
                warn!(env, "API key variable not set; using hashed fallback");
                return None;
            };
            match ApiEmbeddingProvider::new(
                config.endpoint.clone(),
                config.model.clone(),
                api_key,
                config.dimensions,
                Duration::from_millis(config.request_timeout_ms),
            ) {
                Ok(p) => {
                    info!(provider = "api", model = %config.model, "embedding provider ready");
                    Some(Arc::new(p))
                }
                Err(e) => {
                    warn!(error = %e, "API provider failed to initialize, falling back");
                    None
                }
            }
        }
        "hash" => {
            info!(provider = "hash", "using hashed embedding provider");
            None
        }
        other => {
            warn!(provider = other, "unknown provider, using hashed fallback");
            None
        }
    }
}
