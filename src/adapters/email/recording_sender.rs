//! In-memory email sender for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{EmailError, EmailSender, OutgoingEmail};

#[derive(Default)]
struct RecordingState {
    sent: Vec<OutgoingEmail>,
    failing: bool,
}

/// Records every message instead of delivering it. Can be switched into a
/// failing mode to simulate an unreachable provider.
#[derive(Clone, Default)]
pub struct RecordingEmailSender {
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails.
    pub fn failing() -> Self {
        let sender = Self::new();
        sender.set_failing(true);
        sender
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.inner.lock().unwrap().sent.clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let mut state = self.inner.lock().unwrap();
        if state.failing {
            return Err(EmailError::SendFailed("simulated outage".to_string()));
        }
        state.sent.push(email.clone());
        Ok(())
    }
}
