//! Paraphrase generation through the downstream generator.

use std::sync::Arc;

use async_trait::async_trait;
use recall_core::errors::RetrievalError;
use recall_core::models::GeneratorMessage;
use recall_core::traits::{IGenerator, IQueryExpander};
use tracing::debug;

const INSTRUCTIONS: &str = "You rewrite search queries. Reply with alternative phrasings \
of the user's query that could match relevant passages, one per line, without numbering \
or commentary.";

/// Asks an [`IGenerator`] for paraphrases of a query.
pub struct GeneratorQueryExpander {
    generator: Arc<dyn IGenerator>,
}

impl GeneratorQueryExpander {
    pub fn new(generator: Arc<dyn IGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl IQueryExpander for GeneratorQueryExpander {
    async fn expand(&self, query: &str, max_variants: usize) -> Result<Vec<String>, RetrievalError> {
        if max_variants == 0 {
            return Ok(Vec::new());
        }
        let messages = [
            GeneratorMessage::system(format!("{INSTRUCTIONS} Give at most {max_variants}.")),
            GeneratorMessage::user(query),
        ];
        let output = self
            .generator
            .generate(&messages, "")
            .await
            .map_err(|e| RetrievalError::ExpansionFailed {
                reason: e.to_string(),
            })?;

        let variants = parse_variants(&output.content, max_variants);
        debug!(count = variants.len(), "query expanded");
        Ok(variants)
    }
}

/// Split a generator reply into at most `max` query variants.
///
/// Strips list markers ("-", "*", "•", "1.", "2)") and surrounding quotes;
/// drops blank lines.
pub fn parse_variants(reply: &str, max: usize) -> Vec<String> {
    reply
        .lines()
        .map(strip_marker)
        .map(|l| l.trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|l| !l.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
    {
        return rest;
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }
    line
}
