//! Inline sending, queueing, and queue draining.

use std::sync::Arc;

use agora_core::settings::{format_unix_time, keys};
use agora_core::types::Timestamp;
use agora_db::models::mail_queue::NewMail;
use agora_db::repositories::{MailQueueRepo, SettingsRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::error::MailError;
use crate::transport::{MailTransport, OutgoingMail};

/// A queued mail is dropped after this many failed sends.
pub const MAX_SEND_ATTEMPTS: i16 = 3;

/// Delay before the next drain while the queue still holds mail.
const QUEUE_RETRY_SECS: i64 = 60;

/// What happened to a batch handed to [`Mailer::deliver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub queued: u64,
    pub sent: u64,
    pub failed: u64,
}

/// What one queue drain did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub sent: u64,
    pub failed: u64,
    pub dropped: u64,
    /// The `mail_next_send` written afterwards; `None` when the queue is empty.
    pub next_send: Option<Timestamp>,
}

#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Send one mail now.
    pub async fn send_now(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.transport.send(mail).await
    }

    /// Enqueue `mails` when the queue is on, otherwise send them inline.
    ///
    /// Enqueueing into an idle queue schedules a drain right away.
    ///
    /// Inline failures are logged and counted, not returned, so one bad
    /// address does not stop the rest of the batch.
    pub async fn deliver(
        &self,
        pool: &PgPool,
        use_queue: bool,
        mails: Vec<NewMail>,
    ) -> Result<DeliveryReport, MailError> {
        let mut report = DeliveryReport::default();
        if mails.is_empty() {
            return Ok(report);
        }

        if use_queue {
            report.queued = MailQueueRepo::enqueue(pool, &mails).await?;
            // Wake the drain trigger if the queue was idle.
            let now = format_unix_time(Some(Utc::now()));
            SettingsRepo::compare_and_set(pool, keys::MAIL_NEXT_SEND, "0", &now).await?;
            tracing::debug!(queued = report.queued, "Mail queued");
            return Ok(report);
        }

        for mail in mails {
            let outgoing = OutgoingMail {
                to: mail.recipient,
                subject: mail.subject,
                body: mail.body,
            };
            match self.transport.send(&outgoing).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(to = %outgoing.to, error = %e, "Failed to send mail");
                }
            }
        }
        Ok(report)
    }

    /// Send up to `batch_size` queued mails, most urgent first.
    ///
    /// Sent rows are deleted. A failed row has its attempt count bumped and
    /// is dropped once it reaches [`MAX_SEND_ATTEMPTS`]. Afterwards
    /// `mail_next_send` is set to a minute from `now` if mail remains, or
    /// cleared.
    pub async fn drain_queue(
        &self,
        pool: &PgPool,
        batch_size: i64,
        now: Timestamp,
    ) -> Result<DrainReport, MailError> {
        let batch = MailQueueRepo::next_batch(pool, batch_size.max(1)).await?;
        let (mut sent, mut failed, mut dropped) = (0, 0, 0);

        for row in batch {
            let mail = OutgoingMail {
                to: row.recipient,
                subject: row.subject,
                body: row.body,
            };
            match self.transport.send(&mail).await {
                Ok(()) => {
                    MailQueueRepo::delete(pool, row.id).await?;
                    sent += 1;
                }
                Err(e) => {
                    failed += 1;
                    let gave_up = MailQueueRepo::record_failure(pool, row.id, MAX_SEND_ATTEMPTS).await?;
                    if gave_up {
                        dropped += 1;
                    }
                    tracing::warn!(
                        mail_id = row.id,
                        to = %mail.to,
                        attempts = row.attempts + 1,
                        dropped = gave_up,
                        error = %e,
                        "Queued mail send failed"
                    );
                }
            }
        }

        let remaining = MailQueueRepo::count(pool).await?;
        let next_send = (remaining > 0).then(|| now + Duration::seconds(QUEUE_RETRY_SECS));
        SettingsRepo::set(pool, keys::MAIL_NEXT_SEND, &format_unix_time(next_send)).await?;

        if sent > 0 || failed > 0 {
            tracing::info!(sent, failed, dropped, remaining, "Mail queue drained");
        }

        Ok(DrainReport {
            sent,
            failed,
            dropped,
            next_send,
        })
    }
}
