//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GenerationOutcome, GenerationRequest, ImageProviderKind};
use async_trait::async_trait;

/// Trait for image generation endpoints.
///
/// Implementations make exactly one outbound call per `generate` invocation
/// and normalize whatever the endpoint answers (a remote URL or an inline
/// payload) into a single [`GenerationOutcome`]. Failed calls are not
/// retried.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from the given request.
    ///
    /// Rejects invalid requests (empty prompt) before touching the network.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ImageProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ImageProviderKind::Vyro => "Vyro image API",
            ImageProviderKind::Relay => "inference relay",
        }
    }
}
