pub(crate) mod openai;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::UpstreamError;

/// Upstream image generation provider
///
/// The two calls are always issued in sequence: the locator returned by
/// [`request_generation`](Self::request_generation) feeds
/// [`fetch_bytes`](Self::fetch_bytes).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Ask the provider for one image and return where it is hosted
    async fn request_generation(&self, prompt: &str) -> Result<String, UpstreamError>;

    /// Download the raw image behind a locator
    async fn fetch_bytes(&self, locator: &str) -> Result<Bytes, UpstreamError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
