pub mod types;
pub mod chunker;
pub mod embedder;
pub mod vectordb;
pub mod context;

pub use context::{ContextBlock, ContextBuilder, ContextSource, ContextStrategy};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Retrieval unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Embedding model initialization: {0}")]
    ModelInit(String),

    #[error("Tokenization error: {0}")]
    Tokenization(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Index build failed: {chunks} chunks but {embeddings} embeddings")]
    IndexMismatch { chunks: usize, embeddings: usize },

    #[error("Chunking produced no results")]
    EmptyChunks,

    #[error("No relevant context found")]
    NoContext,
}
