//! HTTP surface.
//!
//! JSON endpoints are nested under `/api/`; static pages are served from
//! the configured directory. Layers: access log → CORS → body limit.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{serve_until, start_server, ApiServer, ServerError};
pub use types::ApiContext;
