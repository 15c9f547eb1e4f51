//! Repository for the `mail_queue` table.

use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::mail_queue::{NewMail, QueuedMail};

const COLUMNS: &str = "id, recipient, subject, body, priority, attempts, queued_at";

pub struct MailQueueRepo;

impl MailQueueRepo {
    /// Enqueue a batch of mails in one statement.
    pub async fn enqueue(pool: &PgPool, mails: &[NewMail]) -> Result<u64, sqlx::Error> {
        if mails.is_empty() {
            return Ok(0);
        }
        let recipients: Vec<&str> = mails.iter().map(|m| m.recipient.as_str()).collect();
        let subjects: Vec<&str> = mails.iter().map(|m| m.subject.as_str()).collect();
        let bodies: Vec<&str> = mails.iter().map(|m| m.body.as_str()).collect();
        let priorities: Vec<i16> = mails.iter().map(|m| m.priority).collect();

        let result = sqlx::query(
            "INSERT INTO mail_queue (recipient, subject, body, priority) \
             SELECT r, s, b, p \
             FROM UNNEST($1::TEXT[], $2::TEXT[], $3::TEXT[], $4::SMALLINT[]) AS x(r, s, b, p)",
        )
        .bind(&recipients[..])
        .bind(&subjects[..])
        .bind(&bodies[..])
        .bind(&priorities[..])
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// The next `limit` mails, most urgent first.
    pub async fn next_batch(pool: &PgPool, limit: i64) -> Result<Vec<QueuedMail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mail_queue ORDER BY priority, id LIMIT $1"
        );
        sqlx::query_as::<_, QueuedMail>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Remove a mail after it was handed to the transport.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM mail_queue WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Count a failed send. Rows that reach `max_attempts` are dropped.
    ///
    /// Returns `true` when the row was dropped.
    pub async fn record_failure(
        pool: &PgPool,
        id: DbId,
        max_attempts: i16,
    ) -> Result<bool, sqlx::Error> {
        let attempts = sqlx::query_scalar::<_, i16>(
            "UPDATE mail_queue SET attempts = attempts + 1 WHERE id = $1 RETURNING attempts",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match attempts {
            Some(n) if n >= max_attempts => {
                Self::delete(pool, id).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mail_queue")
            .fetch_one(pool)
            .await
    }
}
