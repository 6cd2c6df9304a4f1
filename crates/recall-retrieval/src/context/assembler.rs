//! ContextAssembler: ranked candidates into one cited, budgeted text block.
//!
//! Token counts use the chars/4 approximation, not a real tokenizer.

use recall_core::constants::{CHARS_PER_TOKEN, DEFAULT_SOURCE_TYPE, META_SOURCE_ID, META_SOURCE_TYPE};
use recall_core::models::{AssembledContext, ContextReference, GeneratorMessage, ScoredCandidate};
use recall_observability::tracing_setup::events;
use tracing::debug;

const SEPARATOR: &str = "\n\n---\n\n";

/// Estimated token count of `text`: characters / 4, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    /// Format the first `max_chunks` candidates as labeled blocks.
    ///
    /// Text over `max_tokens` is cut to `max_tokens * 4` characters. Every
    /// included candidate gets a reference, even if truncation cut its block.
    pub fn assemble(
        candidates: &[ScoredCandidate],
        max_chunks: usize,
        max_tokens: usize,
    ) -> AssembledContext {
        let included = &candidates[..candidates.len().min(max_chunks)];
        if included.is_empty() || max_tokens == 0 {
            return AssembledContext::empty();
        }

        let blocks: Vec<String> = included
            .iter()
            .enumerate()
            .map(|(i, c)| {
                format!(
                    "[Source {}] (relevance: {}%)\n{}",
                    i + 1,
                    (c.score * 100.0).round() as u32,
                    c.content.trim()
                )
            })
            .collect();
        let mut text = blocks.join(SEPARATOR);

        let estimated = estimate_tokens(&text);
        if estimated > max_tokens {
            events::context_truncated(estimated, max_tokens);
            text = truncate_chars(&text, max_tokens * CHARS_PER_TOKEN);
        }

        let references = included.iter().map(reference).collect();
        debug!(chunks = included.len(), tokens = estimate_tokens(&text), "context assembled");

        AssembledContext { text, references }
    }

    /// System message carrying the assembled context to the generator.
    pub fn system_prompt(context: &AssembledContext) -> GeneratorMessage {
        if context.is_empty() {
            return GeneratorMessage::system(
                "No relevant context was found for this question. \
                 Answer from general knowledge and say that no sources were available.",
            );
        }
        GeneratorMessage::system(format!(
            "Answer using the context below. Cite passages as [Source N] \
             and say so when the context does not contain the answer.\n\n{}",
            context.text
        ))
    }
}

fn reference(c: &ScoredCandidate) -> ContextReference {
    ContextReference {
        source_id: c.meta_str(META_SOURCE_ID).unwrap_or(c.id.as_str()).to_string(),
        source_type: c
            .meta_str(META_SOURCE_TYPE)
            .unwrap_or(DEFAULT_SOURCE_TYPE)
            .to_string(),
        chunk_id: c.id.clone(),
        similarity_score: c.score,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => text[..byte].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::models::{Metadata, MessageRole};
    use serde_json::json;

    fn candidate(id: &str, content: &str, score: f32) -> ScoredCandidate {
        let mut metadata = Metadata::new();
        metadata.insert("source_id".to_string(), json!(format!("src-{id}")));
        ScoredCandidate {
            id: id.to_string(),
            score,
            content: content.to_string(),
            metadata,
        }
    }

    #[test]
    fn empty_input_is_empty_context() {
        assert_eq!(ContextAssembler::assemble(&[], 5, 2000), AssembledContext::empty());
    }

    #[test]
    fn formats_labeled_blocks() {
        let cands = vec![candidate("a", "first passage", 0.91), candidate("b", "second", 0.756)];
        let ctx = ContextAssembler::assemble(&cands, 5, 2000);
        assert_eq!(
            ctx.text,
            "[Source 1] (relevance: 91%)\nfirst passage\n\n---\n\n[Source 2] (relevance: 76%)\nsecond"
        );
        assert_eq!(ctx.references.len(), 2);
        assert_eq!(ctx.references[0].source_id, "src-a");
        assert_eq!(ctx.references[0].source_type, "document");
        assert_eq!(ctx.references[1].chunk_id, "b");
    }

    #[test]
    fn max_chunks_limits_blocks_and_references() {
        let cands: Vec<_> = (0..8).map(|i| candidate(&i.to_string(), "text", 0.8)).collect();
        let ctx = ContextAssembler::assemble(&cands, 3, 2000);
        assert_eq!(ctx.references.len(), 3);
        assert!(!ctx.text.contains("[Source 4]"));
    }

    #[test]
    fn over_budget_text_is_truncated() {
        let cands = vec![candidate("a", &"é".repeat(500), 0.9)];
        let ctx = ContextAssembler::assemble(&cands, 5, 10);
        assert_eq!(ctx.text.chars().count(), 40);
        assert_eq!(ctx.references.len(), 1);
    }

    #[test]
    fn estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn system_prompt_embeds_context() {
        let ctx = ContextAssembler::assemble(&[candidate("a", "passage", 0.9)], 5, 100);
        let msg = ContextAssembler::system_prompt(&ctx);
        assert_eq!(msg.role, MessageRole::System);
        assert!(msg.content.ends_with(&ctx.text));

        let none = ContextAssembler::system_prompt(&AssembledContext::empty());
        assert!(none.content.starts_with("No relevant context"));
    }
}
