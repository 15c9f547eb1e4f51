//! Repository for `log_notify` subscriptions and `log_digest` entries.

use agora_core::digest::{DigestPeriod, NotifyRegularity, DIGEST_DAILY_SENT, DIGEST_PENDING};
use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::notify::{DigestRow, NewDigestEntry, Subscriber};

pub struct NotifyRepo;

impl NotifyRepo {
    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    pub async fn subscribe_topic(
        pool: &PgPool,
        member_id: DbId,
        topic_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO log_notify (id_member, id_topic, id_board) VALUES ($1, $2, 0) \
             ON CONFLICT DO NOTHING",
        )
        .bind(member_id)
        .bind(topic_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn subscribe_board(
        pool: &PgPool,
        member_id: DbId,
        board_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO log_notify (id_member, id_topic, id_board) VALUES ($1, 0, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(member_id)
        .bind(board_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Activated members watching `topic_id` or `board_id`, except
    /// `exclude` and members who never want notifications.
    ///
    /// First-only subscribers are left out once they have been sent one
    /// notification for the subscription.
    pub async fn subscribers(
        pool: &PgPool,
        topic_id: DbId,
        board_id: DbId,
        exclude: DbId,
    ) -> Result<Vec<Subscriber>, sqlx::Error> {
        sqlx::query_as::<_, Subscriber>(
            "SELECT DISTINCT ON (m.id) \
                    m.id AS id_member, m.member_name, m.email, m.language, m.notify_regularity \
             FROM log_notify ln \
             JOIN members m ON m.id = ln.id_member \
             WHERE ((ln.id_topic = $1 AND ln.id_board = 0) \
                    OR (ln.id_board = $2 AND ln.id_topic = 0)) \
               AND m.id <> $3 \
               AND m.is_activated \
               AND m.notify_regularity <> $4 \
               AND NOT (m.notify_regularity = $5 AND ln.sent) \
             ORDER BY m.id",
        )
        .bind(topic_id)
        .bind(board_id)
        .bind(exclude)
        .bind(NotifyRegularity::Never.as_i16())
        .bind(NotifyRegularity::FirstOnly.as_i16())
        .fetch_all(pool)
        .await
    }

    /// Flag the subscriptions that produced a first-only notification.
    pub async fn mark_sent(
        pool: &PgPool,
        member_ids: &[DbId],
        topic_id: DbId,
        board_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE log_notify SET sent = true \
             WHERE id_member = ANY($1) \
               AND ((id_topic = $2 AND id_board = 0) OR (id_board = $3 AND id_topic = 0))",
        )
        .bind(member_ids)
        .bind(topic_id)
        .bind(board_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Digests
    // -----------------------------------------------------------------------

    pub async fn add_digest_entries(
        pool: &PgPool,
        entries: &[NewDigestEntry<'_>],
    ) -> Result<(), sqlx::Error> {
        if entries.is_empty() {
            return Ok(());
        }
        let members: Vec<DbId> = entries.iter().map(|e| e.id_member).collect();
        let topics: Vec<DbId> = entries.iter().map(|e| e.id_topic).collect();
        let boards: Vec<DbId> = entries.iter().map(|e| e.id_board).collect();
        let subjects: Vec<&str> = entries.iter().map(|e| e.subject).collect();
        let notes: Vec<&str> = entries.iter().map(|e| e.note_type.as_str()).collect();

        sqlx::query(
            "INSERT INTO log_digest (id_member, id_topic, id_board, subject, note_type, daily) \
             SELECT m, t, b, s, n, $6 \
             FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::BIGINT[], $4::TEXT[], $5::TEXT[]) \
                  AS x(m, t, b, s, n)",
        )
        .bind(&members[..])
        .bind(&topics[..])
        .bind(&boards[..])
        .bind(&subjects[..])
        .bind(&notes[..])
        .bind(DIGEST_PENDING)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Highest `log_digest` id. A digest run only touches rows up to it,
    /// so entries written during the run wait for the next one.
    pub async fn digest_high_water(pool: &PgPool) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT COALESCE(MAX(id), 0) FROM log_digest")
            .fetch_one(pool)
            .await
    }

    /// Entries due in a digest for `period`, ordered by member then id.
    ///
    /// Daily digests take entries not yet in any digest; weekly digests
    /// take everything for weekly members.
    pub async fn digest_rows(
        pool: &PgPool,
        period: DigestPeriod,
        high_water: DbId,
    ) -> Result<Vec<DigestRow>, sqlx::Error> {
        let daily_filter = match period {
            DigestPeriod::Daily => format!("AND ld.daily = {DIGEST_PENDING}"),
            DigestPeriod::Weekly => String::new(),
        };
        let query = format!(
            "SELECT ld.id_member, m.member_name, m.email, m.language, ld.id_topic, \
                    ld.subject, COALESCE(b.name, '') AS board_name, ld.note_type \
             FROM log_digest ld \
             JOIN members m ON m.id = ld.id_member \
             LEFT JOIN boards b ON b.id = ld.id_board \
             WHERE ld.id <= $1 AND m.is_activated AND m.notify_regularity = $2 {daily_filter} \
             ORDER BY ld.id_member, ld.id"
        );
        sqlx::query_as::<_, DigestRow>(&query)
            .bind(high_water)
            .bind(period.regularity().as_i16())
            .fetch_all(pool)
            .await
    }

    /// Close out a digest run up to `high_water`.
    ///
    /// Daily: pending entries become daily-sent. Weekly: every entry is
    /// deleted except those still pending for a daily member.
    pub async fn finish_digest(
        pool: &PgPool,
        period: DigestPeriod,
        high_water: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = match period {
            DigestPeriod::Daily => {
                sqlx::query(
                    "UPDATE log_digest SET daily = $2 \
                     WHERE id <= $1 AND daily = $3 \
                       AND id_member IN (SELECT id FROM members WHERE notify_regularity = $4)",
                )
                .bind(high_water)
                .bind(DIGEST_DAILY_SENT)
                .bind(DIGEST_PENDING)
                .bind(NotifyRegularity::Daily.as_i16())
                .execute(pool)
                .await?
            }
            DigestPeriod::Weekly => {
                sqlx::query(
                    "DELETE FROM log_digest \
                     WHERE id <= $1 \
                       AND NOT (daily = $2 AND id_member IN \
                                (SELECT id FROM members WHERE notify_regularity = $3))",
                )
                .bind(high_water)
                .bind(DIGEST_PENDING)
                .bind(NotifyRegularity::Daily.as_i16())
                .execute(pool)
                .await?
            }
        };
        Ok(result.rows_affected())
    }

    pub async fn pending_count(pool: &PgPool, member_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM log_digest WHERE id_member = $1")
            .bind(member_id)
            .fetch_one(pool)
            .await
    }
}
