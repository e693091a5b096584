use std::fmt;

use crate::config::RagSettings;

use super::chunker::CharacterChunker;
use super::embedder::load_embedder;
use super::types::{Chunker, EmbeddingModel};
use super::vectordb::InMemoryVectorIndex;
use super::RagError;

/// Separator placed between the user's free text and the extracted document.
pub const CONTEXT_BOUNDARY: &str = "\n\n";

/// Which path produced a context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSource {
    /// The combined input, truncated to the cap.
    Full,
    /// Top-ranked chunks joined in rank order, truncated to the cap.
    Retrieved,
}

/// Bounded prompt context. Its length in characters never exceeds the cap
/// it was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    text: String,
    source: ContextSource,
}

impl ContextBlock {
    fn new(text: &str, cap: usize, source: ContextSource) -> Self {
        Self {
            text: truncate_chars(text, cap).to_string(),
            source,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> ContextSource {
        self.source
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ContextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Longest prefix of `text` holding at most `cap` characters.
pub fn truncate_chars(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Join free text and extracted text with [`CONTEXT_BOUNDARY`].
pub fn combine(free_text: &str, extracted_text: &str) -> String {
    let mut combined =
        String::with_capacity(free_text.len() + CONTEXT_BOUNDARY.len() + extracted_text.len());
    combined.push_str(free_text);
    combined.push_str(CONTEXT_BOUNDARY);
    combined.push_str(extracted_text);
    combined
}

/// How a long input is narrowed to fit the cap.
pub trait ContextStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn build(&self, combined: &str, query: &str, cap: usize) -> Result<ContextBlock, RagError>;
}

/// Keep the head of the input. Always succeeds.
pub struct TruncationStrategy;

impl ContextStrategy for TruncationStrategy {
    fn name(&self) -> &'static str {
        "truncation"
    }

    fn build(&self, combined: &str, _query: &str, cap: usize) -> Result<ContextBlock, RagError> {
        Ok(ContextBlock::new(combined, cap, ContextSource::Full))
    }
}

/// Chunk, embed, index, and keep the `top_k` chunks closest to the query.
pub struct RetrievalStrategy<E: EmbeddingModel> {
    chunker: CharacterChunker,
    embedder: E,
    top_k: usize,
}

impl<E: EmbeddingModel> RetrievalStrategy<E> {
    pub fn new(chunker: CharacterChunker, embedder: E, top_k: usize) -> Self {
        Self {
            chunker,
            embedder,
            top_k,
        }
    }
}

impl<E: EmbeddingModel> ContextStrategy for RetrievalStrategy<E> {
    fn name(&self) -> &'static str {
        "retrieval"
    }

    fn build(&self, combined: &str, query: &str, cap: usize) -> Result<ContextBlock, RagError> {
        let chunks = self.chunker.chunk(combined);
        if chunks.is_empty() {
            return Err(RagError::EmptyChunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        let index = InMemoryVectorIndex::from_chunks(chunks, embeddings)?;

        let query_embedding = self.embedder.embed(query)?;
        let hits = index.search(&query_embedding, self.top_k);
        if hits.is_empty() {
            return Err(RagError::NoContext);
        }

        tracing::debug!(
            indexed = index.len(),
            retrieved = hits.len(),
            top_score = hits[0].score,
            "Context narrowed by retrieval"
        );

        let joined = hits
            .iter()
            .map(|h| h.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ContextBlock::new(&joined, cap, ContextSource::Retrieved))
    }
}

/// Applies the narrowing threshold and guards the configured strategy:
/// any retrieval failure falls back to truncation.
pub struct ContextBuilder {
    strategy: Box<dyn ContextStrategy>,
    threshold: usize,
}

impl ContextBuilder {
    pub fn new(strategy: Box<dyn ContextStrategy>, threshold: usize) -> Self {
        Self {
            strategy,
            threshold,
        }
    }

    /// Builder that never narrows.
    pub fn truncating() -> Self {
        Self::new(
            Box::new(TruncationStrategy),
            RagSettings::default().threshold_chars,
        )
    }

    /// Resolve retrieval availability once: enabled in settings, runtime
    /// compiled in, and the embedding model loads.
    pub fn from_settings(settings: &RagSettings) -> Self {
        if !settings.enabled {
            tracing::info!("Retrieval disabled by configuration, using truncation");
            return Self::new(Box::new(TruncationStrategy), settings.threshold_chars);
        }

        match load_embedder(&settings.model_dir) {
            Ok(embedder) => {
                tracing::info!(
                    dim = embedder.dimension(),
                    top_k = settings.top_k,
                    "Retrieval available"
                );
                let strategy = RetrievalStrategy::new(
                    CharacterChunker::new(settings.chunk_size, settings.chunk_overlap),
                    embedder,
                    settings.top_k,
                );
                Self::new(Box::new(strategy), settings.threshold_chars)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Retrieval unavailable, using truncation");
                Self::new(Box::new(TruncationStrategy), settings.threshold_chars)
            }
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn build(
        &self,
        free_text: &str,
        extracted_text: &str,
        query: &str,
        cap: usize,
    ) -> ContextBlock {
        let combined = combine(free_text, extracted_text);
        let fallback = || ContextBlock::new(&combined, cap, ContextSource::Full);

        if combined.chars().count() <= self.threshold {
            return fallback();
        }

        match self.strategy.build(&combined, query, cap) {
            Ok(block) if !block.is_empty() || cap == 0 => block,
            Ok(_) => {
                tracing::warn!(
                    strategy = self.strategy.name(),
                    "Strategy produced empty context, falling back to truncation"
                );
                fallback()
            }
            Err(e) => {
                tracing::warn!(
                    strategy = self.strategy.name(),
                    error = %e,
                    "Context narrowing failed, falling back to truncation"
                );
                fallback()
            }
        }
    }
}
