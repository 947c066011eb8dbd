//! Email adapters.
//!
//! - `ResendEmailSender` - Delivers through the Resend HTTP API
//! - `RecordingEmailSender` - Captures messages in memory for tests

mod recording_sender;
mod resend_sender;

pub use recording_sender::RecordingEmailSender;
pub use resend_sender::{ResendConfig, ResendEmailSender};
