//! Sliding-window chunker with natural-break snapping.

use recall_core::config::ChunkingConfig;
use recall_core::models::Chunk;
use tracing::debug;

/// Break delimiters in priority order. Delimiters within a tier are
/// equally preferred; the one closest to the window end wins.
const BREAK_TIERS: &[&[&str]] = &[&[". ", "! ", "? "], &["\n\n"], &["\n"], &[" "]];

/// Split `text` with the default minimum chunk length and break ratio.
pub fn split(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    Chunker::new(ChunkingConfig {
        chunk_size,
        overlap,
        ..Default::default()
    })
    .split(text)
}

/// Character-based sliding-window chunker.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into chunks in document order.
    ///
    /// Chunks whose trimmed text is shorter than `min_chunk_len` are
    /// dropped, so the result can be shorter than `ceil(len / chunk_size)`.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let chunk_size = self.config.chunk_size.max(1);

        let mut windows: Vec<(usize, usize, String)> = Vec::new();
        let mut start = 0;

        while start < len {
            let mut end = (start + chunk_size).min(len);
            if end < len {
                end = self.find_break(&chars, start, end);
            }

            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();
            if trimmed.chars().count() >= self.config.min_chunk_len.max(1) {
                windows.push((start, end, trimmed.to_string()));
            }

            if end >= len {
                break;
            }

            // Step back by the overlap, but never stall or move backwards.
            let next = end.saturating_sub(self.config.overlap);
            start = if next > start { next } else { end };
        }

        let total_chunks = windows.len();
        debug!(chars = len, chunks = total_chunks, "document chunked");

        windows
            .into_iter()
            .enumerate()
            .map(|(index, (start, end, text))| Chunk {
                text,
                index,
                total_chunks,
                start,
                end,
            })
            .collect()
    }

    /// Pick the window end for `[start, end)` when more text follows.
    fn find_break(&self, chars: &[char], start: usize, end: usize) -> usize {
        let chunk_size = self.config.chunk_size.max(1);
        let min_end = start + (chunk_size as f64 * self.config.min_break_ratio).ceil() as usize;

        for tier in BREAK_TIERS {
            let best = tier
                .iter()
                .filter_map(|delim| last_break(chars, start, end, delim))
                .max();
            if let Some(pos) = best {
                if pos >= min_end {
                    return pos;
                }
            }
        }

        // Nearest preceding space, even if it makes a short chunk.
        if let Some(space) = (start + 1..end).rev().find(|&i| chars[i] == ' ') {
            return space + 1;
        }

        end
    }
}

/// Position just past the last occurrence of `delim` inside `[start, end)`.
fn last_break(chars: &[char], start: usize, end: usize, delim: &str) -> Option<usize> {
    let delim: Vec<char> = delim.chars().collect();
    if end < start + delim.len() {
        return None;
    }
    (start..=end - delim.len())
        .rev()
        .find(|&i| chars[i..i + delim.len()] == delim[..])
        .map(|i| i + delim.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkingConfig {
            chunk_size,
            overlap,
            ..Default::default()
        })
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(split("", 500, 50).is_empty());
        assert!(split("   \n\t  ", 500, 50).is_empty());
    }

    #[test]
    fn short_text_yields_one_chunk() {
        let chunks = split("A single sentence that is long enough.", 500, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].total_chunks, 1);
        assert_eq!(chunks[0].text, "A single sentence that is long enough.");
    }

    #[test]
    fn text_below_minimum_is_discarded() {
        assert!(split("too short", 500, 50).is_empty());
    }

    #[test]
    fn prefers_sentence_break_over_space() {
        // Sentence end at char 80, plenty of spaces after it.
        let mut text = "x".repeat(78);
        text.push_str(". ");
        text.push_str(&"word ".repeat(40));
        let chunks = chunker(100, 0).split(&text);
        assert_eq!(chunks[0].end, 80);
        assert!(chunks[0].text.ends_with('.'));
    }

    #[test]
    fn sentence_break_too_early_is_rejected() {
        // Sentence end at char 20 would shrink a 100-char chunk below 70%.
        let mut text = "x".repeat(18);
        text.push_str(". ");
        text.push_str(&"word ".repeat(40));
        let chunks = chunker(100, 0).split(&text);
        assert_eq!(chunks[0].end, 100);
    }

    #[test]
    fn paragraph_beats_newline() {
        let mut text = "a".repeat(75);
        text.push_str("\n\n");
        text.push_str(&"b".repeat(10));
        text.push('\n');
        text.push_str(&"c".repeat(50));
        let chunks = chunker(100, 0).split(&text);
        assert_eq!(chunks[0].end, 77);
    }

    #[test]
    fn falls_back_to_early_space_then_hard_cut() {
        // Only space is at char 25: too early for a natural break, but
        // still preferred over cutting a word.
        let mut text = "a".repeat(25);
        text.push(' ');
        text.push_str(&"b".repeat(200));
        let chunks = chunker(100, 0).split(&text);
        let ends: Vec<usize> = chunks.iter().map(|c| c.end).collect();
        assert_eq!(ends, vec![26, 126, 226]);

        // No whitespace at all: hard cuts at the boundary.
        let chunks = chunker(100, 0).split(&"z".repeat(250));
        let ends: Vec<usize> = chunks.iter().map(|c| c.end).collect();
        assert_eq!(ends, vec![100, 200, 250]);
    }

    #[test]
    fn overlap_not_smaller_than_chunk_size_terminates() {
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let chunks = chunker(50, 80).split(&text);
        assert!(!chunks.is_empty());
        for pair in chunks.windows(2) {
            assert!(pair[1].start > pair[0].start);
        }
    }

    #[test]
    fn indices_and_totals_are_consistent() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(50);
        let chunks = split(&text, 200, 20);
        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.total_chunks, total);
        }
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let text = "日本語のテキストです。".repeat(60);
        let chunks = split(&text, 100, 10);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 100));
    }
}
