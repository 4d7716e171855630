//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GeneratedImage, GenerationRequest};
use async_trait::async_trait;

/// Trait for image generation backends.
///
/// There is deliberately no retry helper here: failures are surfaced to the
/// caller, who decides whether to trigger the action again.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Checks if the backend is reachable and the credential is valid.
    async fn health_check(&self) -> Result<()>;
}
