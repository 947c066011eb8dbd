//! Canned PDF renderer for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{DocumentRenderer, RenderError};

#[derive(Default)]
struct RendererState {
    rendered: Vec<String>,
    next_error: Option<RenderError>,
}

/// Returns a minimal fixed PDF for any input and remembers what it was
/// asked to render.
#[derive(Clone, Default)]
pub struct StaticPdfRenderer {
    inner: Arc<Mutex<RendererState>>,
}

impl StaticPdfRenderer {
    pub const PDF_BYTES: &'static [u8] = b"%PDF-1.4\n%static\n%%EOF\n";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, error: RenderError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// HTML documents received so far.
    pub fn rendered(&self) -> Vec<String> {
        self.inner.lock().unwrap().rendered.clone()
    }
}

#[async_trait]
impl DocumentRenderer for StaticPdfRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        state.rendered.push(html.to_string());
        Ok(Self::PDF_BYTES.to_vec())
    }
}
