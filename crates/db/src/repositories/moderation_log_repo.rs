//! Repository for the `moderation_log` table.

use agora_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::moderation::{ModerationLogEntry, NewModerationLog};

const COLUMNS: &str = "id, action, id_member, id_board, id_topic, id_msg, extra, log_time";

pub struct ModerationLogRepo;

impl ModerationLogRepo {
    pub async fn log(pool: &PgPool, entry: &NewModerationLog<'_>) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO moderation_log (action, id_member, id_board, id_topic, id_msg, extra) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(entry.action)
        .bind(entry.id_member)
        .bind(entry.id_board)
        .bind(entry.id_topic)
        .bind(entry.id_msg)
        .bind(&entry.extra)
        .fetch_one(pool)
        .await
    }

    /// Entries for one topic, newest first.
    pub async fn for_topic(
        pool: &PgPool,
        topic_id: DbId,
    ) -> Result<Vec<ModerationLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM moderation_log WHERE id_topic = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, ModerationLogEntry>(&query)
            .bind(topic_id)
            .fetch_all(pool)
            .await
    }

    /// Delete entries logged before `cutoff`. Returns rows removed.
    pub async fn prune(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM moderation_log WHERE log_time < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
