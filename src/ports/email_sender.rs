//! Email delivery port.

use async_trait::async_trait;
use thiserror::Error;

/// A fully composed message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("email delivery timed out")]
    Timeout,

    #[error("failed to send email: {0}")]
    SendFailed(String),

    #[error("invalid email configuration: {0}")]
    InvalidConfig(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}
