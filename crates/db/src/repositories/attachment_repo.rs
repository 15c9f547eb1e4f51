//! Repository for the `attachments` table.

use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::attachment::AttachmentContext;

/// Attachment columns joined with the owning message's topic and board.
const CONTEXT_SELECT: &str = "\
    SELECT a.id, a.id_msg, m.id_topic, m.id_board, a.filename, a.approved \
    FROM attachments a JOIN messages m ON m.id = a.id_msg";

pub struct AttachmentRepo;

impl AttachmentRepo {
    pub async fn find_context(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttachmentContext>, sqlx::Error> {
        let query = format!("{CONTEXT_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, AttachmentContext>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every attachment of one message.
    pub async fn for_message(
        pool: &PgPool,
        msg_id: DbId,
    ) -> Result<Vec<AttachmentContext>, sqlx::Error> {
        let query = format!("{CONTEXT_SELECT} WHERE a.id_msg = $1 ORDER BY a.id");
        sqlx::query_as::<_, AttachmentContext>(&query)
            .bind(msg_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        msg_id: DbId,
        filename: &str,
        approved: bool,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO attachments (id_msg, filename, approved) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(msg_id)
        .bind(filename)
        .bind(approved)
        .fetch_one(pool)
        .await
    }

    /// Approve attachments. Returns rows changed.
    pub async fn approve(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE attachments SET approved = true WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete rejected attachments. Returns rows removed.
    pub async fn delete(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
