use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{GeneratorMessage, GeneratorOutput};

/// Downstream text generator, treated as a black box.
#[async_trait]
pub trait IGenerator: Send + Sync {
    async fn generate(
        &self,
        messages: &[GeneratorMessage],
        context_text: &str,
    ) -> Result<GeneratorOutput, ProviderError>;
}
