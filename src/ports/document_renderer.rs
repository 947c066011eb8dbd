//! Document rendering port.
//!
//! Converts a complete HTML document into PDF bytes. The domain never
//! depends on a particular rendering engine.

use async_trait::async_trait;
use thiserror::Error;

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Render HTML to an A4 PDF.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the renderer is unreachable, times out or
    /// produces nothing.
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("document renderer unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("document rendering timed out after {0} seconds")]
    Timeout(u64),

    #[error("PDF conversion failed: {0}")]
    ConversionFailed(String),

    #[error("renderer returned an empty document")]
    EmptyOutput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_renderer_is_object_safe() {
        fn _accepts_dyn(_renderer: &dyn DocumentRenderer) {}
    }

    #[test]
    fn timeout_message_names_the_limit() {
        assert_eq!(
            RenderError::Timeout(15).to_string(),
            "document rendering timed out after 15 seconds"
        );
    }
}
