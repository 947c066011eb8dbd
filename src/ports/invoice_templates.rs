//! Invoice template port.
//!
//! Turns an `Invoice` into presentation: the notification email and the
//! HTML handed to the document renderer.

use thiserror::Error;

use crate::domain::billing::Invoice;

/// Subject and bodies of the invoice email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template rendering failed: {0}")]
    RenderFailed(String),
}

/// Synchronous: templates are pure string composition.
pub trait InvoiceTemplates: Send + Sync {
    fn invoice_email(&self, invoice: &Invoice) -> Result<RenderedEmail, TemplateError>;

    fn invoice_document(&self, invoice: &Invoice) -> Result<String, TemplateError>;
}
