//! Repository for the `topics` and `messages` tables.
//!
//! Mutations that race with other moderators are conditional on the value
//! the caller last read (`WHERE locked = $old`, `WHERE id_board = $seen`)
//! and report whether they applied.

use agora_core::lock::LockState;
use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::topic::{CreateTopic, Message, Topic};

/// Column list for `topics` queries.
const COLUMNS: &str = "\
    id, id_board, id_member_started, id_first_msg, id_last_msg, locked, is_sticky, \
    approved, id_previous_board";

/// Column list for `messages` queries.
const MESSAGE_COLUMNS: &str =
    "id, id_topic, id_board, id_member, subject, body, approved, poster_time";

pub struct TopicRepo;

impl TopicRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = $1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The topic's first message, which carries its subject.
    pub async fn first_message(pool: &PgPool, topic_id: DbId) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE id = (SELECT id_first_msg FROM topics WHERE id = $1)"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(topic_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a topic with its first message.
    pub async fn create(pool: &PgPool, input: &CreateTopic) -> Result<Topic, sqlx::Error> {
        let approved = input.approved.unwrap_or(true);
        let mut tx = pool.begin().await?;

        let topic_id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO topics (id_board, id_member_started, approved) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(input.id_board)
        .bind(input.id_member)
        .bind(approved)
        .fetch_one(&mut *tx)
        .await?;

        let msg_id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO messages (id_topic, id_board, id_member, subject, body, approved) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(topic_id)
        .bind(input.id_board)
        .bind(input.id_member)
        .bind(&input.subject)
        .bind(&input.body)
        .bind(approved)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE topics SET id_first_msg = $2, id_last_msg = $2 WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let topic = sqlx::query_as::<_, Topic>(&query)
            .bind(topic_id)
            .bind(msg_id)
            .fetch_one(&mut *tx)
            .await?;

        if approved {
            sqlx::query("UPDATE boards SET id_last_msg = GREATEST(id_last_msg, $2) WHERE id = $1")
                .bind(input.id_board)
                .bind(msg_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(topic)
    }

    // -----------------------------------------------------------------------
    // Moderation
    // -----------------------------------------------------------------------

    /// Move the lock from `from` to `to` if no one changed it meanwhile.
    pub async fn set_locked(
        pool: &PgPool,
        id: DbId,
        from: LockState,
        to: LockState,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE topics SET locked = $3 WHERE id = $1 AND locked = $2")
            .bind(id)
            .bind(from.as_i16())
            .bind(to.as_i16())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip `is_sticky` from `from` if no one changed it meanwhile.
    pub async fn set_sticky(pool: &PgPool, id: DbId, from: bool) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE topics SET is_sticky = NOT $2 WHERE id = $1 AND is_sticky = $2")
                .bind(id)
                .bind(from)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a topic and its messages from `from_board` to `to_board`.
    ///
    /// Returns `false` if the topic is no longer on `from_board`.
    pub async fn move_to_board(
        pool: &PgPool,
        id: DbId,
        from_board: DbId,
        to_board: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let moved = sqlx::query(
            "UPDATE topics SET id_board = $3, id_previous_board = $2 \
             WHERE id = $1 AND id_board = $2",
        )
        .bind(id)
        .bind(from_board)
        .bind(to_board)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if !moved {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE messages SET id_board = $2 WHERE id_topic = $1")
            .bind(id)
            .bind(to_board)
            .execute(&mut *tx)
            .await?;

        refresh_last_msg(&mut tx, &[from_board, to_board]).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a topic with its messages, attachments, and per-topic logs.
    ///
    /// Returns `false` if the topic is no longer on `board_id`.
    pub async fn delete(pool: &PgPool, id: DbId, board_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Messages and attachments cascade from the topic row.
        let deleted = sqlx::query("DELETE FROM topics WHERE id = $1 AND id_board = $2")
            .bind(id)
            .bind(board_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !deleted {
            tx.rollback().await?;
            return Ok(false);
        }

        for table in ["log_notify", "log_topics"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE id_topic = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        refresh_last_msg(&mut tx, &[board_id]).await?;

        tx.commit().await?;
        Ok(true)
    }
}

async fn refresh_last_msg(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    board_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE boards b SET id_last_msg = COALESCE( \
             (SELECT MAX(m.id) FROM messages m WHERE m.id_board = b.id AND m.approved), 0) \
         WHERE b.id = ANY($1)",
    )
    .bind(board_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
