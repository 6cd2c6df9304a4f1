use proptest::prelude::*;
use recall_chunking::split;

fn words() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 0..400).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn terminates_with_bounded_ordered_chunks(
        text in words(),
        chunk_size in 40usize..400,
        overlap_pct in 0usize..50,
    ) {
        let overlap = chunk_size * overlap_pct / 100;
        let chunks = split(&text, chunk_size, overlap);

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
            prop_assert_eq!(chunk.total_chunks, chunks.len());
            prop_assert!(chunk.end - chunk.start <= chunk_size);
            prop_assert!(chunk.text.chars().count() >= 20);
        }
        for pair in chunks.windows(2) {
            prop_assert!(pair[1].start > pair[0].start);
        }
    }

    #[test]
    fn chunks_cover_document_without_gaps(
        text in words(),
        chunk_size in 40usize..400,
        overlap_pct in 0usize..50,
    ) {
        let overlap = chunk_size * overlap_pct / 100;
        let chunks = split(&text, chunk_size, overlap);
        let len = text.chars().count();

        if let Some(first) = chunks.first() {
            prop_assert_eq!(first.start, 0);
        }
        for pair in chunks.windows(2) {
            prop_assert!(pair[1].start <= pair[0].end, "gap between chunks");
        }
        if let Some(last) = chunks.last() {
            // Only a discarded sub-minimum tail may be left uncovered.
            prop_assert!(len - last.end < 20 + 2);
        }
    }

    #[test]
    fn arbitrary_overlap_never_loops(
        text in ".{0,600}",
        chunk_size in 1usize..64,
        overlap in 0usize..128,
    ) {
        let chunks = split(&text, chunk_size, overlap);
        prop_assert!(chunks.len() <= text.chars().count());
    }
}
