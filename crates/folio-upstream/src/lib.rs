//! Upstream layer: request body types, key placement, and the HTTP transport.

mod auth;
mod body;
mod error;

pub use auth::KeyPlacement;
pub use body::{Content, GenerateContentRequest, GenerationConfig, Part};
pub use error::UpstreamError;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::UpstreamClient;

use async_trait::async_trait;
use serde_json::Value;

/// Something that can turn a request body into an upstream JSON response.
///
/// The server holds a `dyn Generate` so handlers can run against a stub.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, body: &GenerateContentRequest) -> Result<Value, UpstreamError>;
}
