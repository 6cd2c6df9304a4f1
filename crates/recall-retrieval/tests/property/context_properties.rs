//! Property tests for context assembly budgets.

use proptest::prelude::*;
use recall_core::models::{Metadata, ScoredCandidate};
use recall_retrieval::context::estimate_tokens;
use recall_retrieval::ContextAssembler;

fn candidates() -> impl Strategy<Value = Vec<ScoredCandidate>> {
    prop::collection::vec(("[a-zé ]{0,400}", 0.0f32..=1.0), 0..12).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (content, score))| ScoredCandidate {
                id: format!("doc:{i}"),
                score,
                content,
                metadata: Metadata::new(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn text_never_exceeds_char_budget(
        cands in candidates(),
        max_chunks in 0usize..10,
        max_tokens in 0usize..500,
    ) {
        let ctx = ContextAssembler::assemble(&cands, max_chunks, max_tokens);
        prop_assert!(ctx.text.chars().count() <= max_tokens * 4);
        prop_assert!(estimate_tokens(&ctx.text) <= max_tokens);
    }

    #[test]
    fn one_reference_per_included_candidate(
        cands in candidates(),
        max_chunks in 0usize..10,
    ) {
        let ctx = ContextAssembler::assemble(&cands, max_chunks, 2000);
        prop_assert_eq!(ctx.references.len(), cands.len().min(max_chunks));
        for (r, c) in ctx.references.iter().zip(&cands) {
            prop_assert_eq!(&r.chunk_id, &c.id);
        }
    }

    #[test]
    fn empty_candidates_give_empty_context(max_chunks in 0usize..10, max_tokens in 0usize..500) {
        let ctx = ContextAssembler::assemble(&[], max_chunks, max_tokens);
        prop_assert!(ctx.text.is_empty());
        prop_assert!(ctx.references.is_empty());
    }
}
