use super::types::{Chunker, TextChunk};

/// Break separators tried in order when looking for a natural chunk end.
const BREAK_SEPARATORS: &[&str] = &["\n\n", ". ", "\n", " "];

/// Fixed-size character window chunker with overlap.
///
/// Each window holds at most `chunk_size` characters. When the window does
/// not reach the end of the text, it is shortened to the last paragraph,
/// sentence or whitespace break found in its final 20%. The next window
/// starts `chunk_overlap` characters before the previous end.
pub struct CharacterChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }
}

impl Default for CharacterChunker {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl Chunker for CharacterChunker {
    fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        if text.trim().is_empty() {
            return chunks;
        }

        // boundaries[k] is the byte offset of the k-th character; the last
        // entry is text.len() so any char range maps to a byte slice.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = boundaries.len() - 1;

        let mut start = 0;
        while start < total {
            let end = (start + self.chunk_size).min(total);
            let break_at = if end < total {
                let search_start = start + self.chunk_size * 4 / 5;
                find_break(text, &boundaries, search_start, end).unwrap_or(end)
            } else {
                end
            };

            let content = text[boundaries[start]..boundaries[break_at]].trim();
            if !content.is_empty() {
                chunks.push(TextChunk {
                    content: content.to_string(),
                    chunk_index: chunks.len(),
                    char_offset: start,
                });
            }

            if break_at >= total {
                break;
            }

            let next = break_at.saturating_sub(self.chunk_overlap);
            start = if next > start { next } else { break_at };
        }

        chunks
    }
}

/// Find the char index just past the last separator in `[from, to)`.
fn find_break(text: &str, boundaries: &[usize], from: usize, to: usize) -> Option<usize> {
    if from >= to {
        return None;
    }
    let window = &text[boundaries[from]..boundaries[to]];
    BREAK_SEPARATORS.iter().find_map(|sep| {
        window
            .rfind(sep)
            .map(|pos| from + window[..pos + sep.len()].chars().count())
    })
}
