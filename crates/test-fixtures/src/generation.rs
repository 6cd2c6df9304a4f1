//! Scripted generator and query expander.

use std::sync::Mutex;

use async_trait::async_trait;
use recall_core::errors::{ProviderError, RetrievalError};
use recall_core::models::{GeneratorMessage, GeneratorOutput};
use recall_core::traits::{IGenerator, IQueryExpander};

/// Generator that replies with a fixed string and remembers its inputs.
pub struct ScriptedGenerator {
    reply: Result<String, String>,
    seen: Mutex<Vec<(Vec<GeneratorMessage>, String)>>,
}

impl ScriptedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Messages and context text of every call, in order.
    pub fn calls(&self) -> Vec<(Vec<GeneratorMessage>, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl IGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        messages: &[GeneratorMessage],
        context_text: &str,
    ) -> Result<GeneratorOutput, ProviderError> {
        self.seen
            .lock()
            .unwrap()
            .push((messages.to_vec(), context_text.to_string()));
        match &self.reply {
            Ok(content) => Ok(GeneratorOutput {
                content: content.clone(),
                token_count: content.split_whitespace().count(),
            }),
            Err(reason) => Err(ProviderError::Request {
                provider: "scripted-generator".to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Expander that returns a fixed list of variants.
pub struct ScriptedExpander {
    variants: Option<Vec<String>>,
}

impl ScriptedExpander {
    pub fn new(variants: &[&str]) -> Self {
        Self {
            variants: Some(variants.iter().map(|v| v.to_string()).collect()),
        }
    }

    pub fn failing() -> Self {
        Self { variants: None }
    }
}

#[async_trait]
impl IQueryExpander for ScriptedExpander {
    async fn expand(&self, _query: &str, max_variants: usize) -> Result<Vec<String>, RetrievalError> {
        match &self.variants {
            Some(v) => Ok(v.iter().take(max_variants).cloned().collect()),
            None => Err(RetrievalError::ExpansionFailed {
                reason: "scripted failure".to_string(),
            }),
        }
    }
}
