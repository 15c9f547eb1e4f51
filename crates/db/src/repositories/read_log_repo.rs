//! Repository for `log_boards`, `log_mark_read`, and `log_topics`.

use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::board::Board;
use crate::models::topic::Topic;

pub struct ReadLogRepo;

impl ReadLogRepo {
    /// Mark `boards` read up to each board's last message and forget the
    /// member's per-topic pointers inside them.
    pub async fn mark_boards_read(
        pool: &PgPool,
        member_id: DbId,
        boards: &[Board],
    ) -> Result<(), sqlx::Error> {
        if boards.is_empty() {
            return Ok(());
        }
        let ids: Vec<DbId> = boards.iter().map(|b| b.id).collect();
        let last_msgs: Vec<DbId> = boards.iter().map(|b| b.id_last_msg).collect();

        let mut tx = pool.begin().await?;

        for table in ["log_boards", "log_mark_read"] {
            let query = format!(
                "INSERT INTO {table} (id_member, id_board, id_msg) \
                 SELECT $1, b, m FROM UNNEST($2::BIGINT[], $3::BIGINT[]) AS t(b, m) \
                 ON CONFLICT (id_member, id_board) DO UPDATE SET id_msg = EXCLUDED.id_msg"
            );
            sqlx::query(&query)
                .bind(member_id)
                .bind(&ids[..])
                .bind(&last_msgs[..])
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "DELETE FROM log_topics lt USING topics t \
             WHERE lt.id_topic = t.id AND lt.id_member = $1 AND t.id_board = ANY($2)",
        )
        .bind(member_id)
        .bind(&ids[..])
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Reset the member's read pointer for `topic` so it shows as unread,
    /// lowering the board marks below its first message.
    pub async fn mark_topic_unread(
        pool: &PgPool,
        member_id: DbId,
        topic: &Topic,
    ) -> Result<(), sqlx::Error> {
        let before_first = (topic.id_first_msg - 1).max(0);
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO log_topics (id_member, id_topic, id_msg) VALUES ($1, $2, $3) \
             ON CONFLICT (id_member, id_topic) DO UPDATE SET id_msg = EXCLUDED.id_msg",
        )
        .bind(member_id)
        .bind(topic.id)
        .bind(before_first)
        .execute(&mut *tx)
        .await?;

        for table in ["log_boards", "log_mark_read"] {
            let query = format!(
                "UPDATE {table} SET id_msg = LEAST(id_msg, $3) \
                 WHERE id_member = $1 AND id_board = $2"
            );
            sqlx::query(&query)
                .bind(member_id)
                .bind(topic.id_board)
                .bind(before_first)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The member's read pointer on a board, if any.
    pub async fn board_mark(
        pool: &PgPool,
        member_id: DbId,
        board_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id_msg FROM log_boards WHERE id_member = $1 AND id_board = $2",
        )
        .bind(member_id)
        .bind(board_id)
        .fetch_optional(pool)
        .await
    }

    /// The member's read pointer in a topic, if any.
    pub async fn topic_mark(
        pool: &PgPool,
        member_id: DbId,
        topic_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id_msg FROM log_topics WHERE id_member = $1 AND id_topic = $2",
        )
        .bind(member_id)
        .bind(topic_id)
        .fetch_optional(pool)
        .await
    }
}
