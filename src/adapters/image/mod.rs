//! Image Adapters.
//!
//! - `HttpImageBackend` - ImageBackend over the image micro-service
//! - `MockImageBackend` - Configurable mock for testing
//! - `GeminiImageRenderer` - ImageRenderer used by the micro-service itself

mod gemini_image_renderer;
mod http_image_backend;
mod mock_image_backend;

pub use gemini_image_renderer::GeminiImageRenderer;
pub use http_image_backend::HttpImageBackend;
pub use mock_image_backend::MockImageBackend;

use std::sync::Arc;

use crate::config::ImageConfig;
use crate::ports::ImageBackend;

/// Builds the image backend, or `None` when no service URL is configured.
pub fn build_image_backend(config: &ImageConfig) -> Option<Arc<dyn ImageBackend>> {
    config
        .service_url()
        .map(|url| Arc::new(HttpImageBackend::new(url)) as Arc<dyn ImageBackend>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_requires_service_url() {
        assert!(build_image_backend(&ImageConfig::default()).is_none());

        let config = ImageConfig {
            service_url: Some("http://localhost:8000".to_string()),
            ..Default::default()
        };
        assert!(build_image_backend(&config).is_some());
    }
}
