//! The seam between composing mail and sending it.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::MailError;

/// A fully composed plain-text mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Logs every mail and drops it. Used when SMTP is not configured.
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "Mail not sent (SMTP not configured)");
        Ok(())
    }
}

/// Keeps every mail in memory; optionally rejects some recipients.
///
/// Stands in for SMTP in tests.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    reject: Vec<String>,
}

impl RecordingTransport {
    /// A transport that fails for the listed recipients.
    pub fn rejecting(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::default(),
            reject: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.reject.iter().any(|r| *r == mail.to) {
            return Err(MailError::Build(format!("recipient {} rejected", mail.to)));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail.clone());
        }
        Ok(())
    }
}
