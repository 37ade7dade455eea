// Vision client trait: the seam between the pipeline and the vendor API.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Annotation;

/// Trait for annotating a single image. Implementations must be async
/// because every real provider sits behind an HTTP API.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Download and annotate the image at `url`.
    async fn analyze_image(&self, url: &str) -> Result<Annotation>;
}
