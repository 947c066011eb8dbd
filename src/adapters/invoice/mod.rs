//! Invoice presentation adapters.
//!
//! - `HtmlInvoiceTemplates` - Email and printable HTML for an `Invoice`
//! - `GotenbergPdfRenderer` - HTML to PDF through a Gotenberg service
//! - `StaticPdfRenderer` - Canned renderer for tests

mod gotenberg_renderer;
mod html_templates;
mod static_renderer;

pub use gotenberg_renderer::{GotenbergConfig, GotenbergPdfRenderer};
pub use html_templates::HtmlInvoiceTemplates;
pub use static_renderer::StaticPdfRenderer;
