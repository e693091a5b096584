pub mod types;
pub mod client;
pub mod gateway;

pub use client::ChatCompletionsClient;
pub use gateway::{ModelGateway, ModelResponse, SENTINEL_PREFIX};
pub use types::{ChatMessage, ChatRequest, LlmClient, Prompt, Role};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("cannot connect to {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    ResponseParsing(String),

    #[error("response contained no choices")]
    EmptyChoices,
}
