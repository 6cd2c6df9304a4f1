//! Property tests for the hashed fallback and cosine similarity.

use proptest::prelude::*;
use recall_embeddings::{clamp_unit, cosine_similarity, HashedFallback};

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}( [a-z]{1,12}){0,20}"
}

proptest! {
    #[test]
    fn fallback_is_deterministic(text in text_strategy(), dims in 8usize..256) {
        let fallback = HashedFallback::new(dims);
        prop_assert_eq!(fallback.embed_text(&text), fallback.embed_text(&text));
    }

    #[test]
    fn fallback_has_fixed_dimension_and_unit_norm(text in text_strategy(), dims in 8usize..256) {
        let vec = HashedFallback::new(dims).embed_text(&text);
        prop_assert_eq!(vec.len(), dims);
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!((norm - 1.0).abs() < 1e-4, "norm was {}", norm);
    }

    #[test]
    fn self_similarity_is_one(text in text_strategy()) {
        let vec = HashedFallback::new(64).embed_text(&text);
        let sim = cosine_similarity(&vec, &vec).unwrap();
        prop_assert!((sim - 1.0).abs() < 1e-5);
    }

    #[test]
    fn opposite_vectors_score_minus_one(text in text_strategy()) {
        let vec = HashedFallback::new(64).embed_text(&text);
        let neg: Vec<f32> = vec.iter().map(|x| -x).collect();
        let sim = cosine_similarity(&vec, &neg).unwrap();
        prop_assert!((sim + 1.0).abs() < 1e-5);
    }

    #[test]
    fn similarity_stays_in_range(a in text_strategy(), b in text_strategy()) {
        let fallback = HashedFallback::new(32);
        let sim = cosine_similarity(&fallback.embed_text(&a), &fallback.embed_text(&b)).unwrap();
        prop_assert!((-1.0..=1.0).contains(&sim));
        prop_assert!((0.0..=1.0).contains(&clamp_unit(sim)));
    }
}
