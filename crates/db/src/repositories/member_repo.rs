//! Repository for the `members` and `membergroups` tables.

use agora_core::groups::{GROUP_ADMIN, NON_ANNOUNCEABLE_GROUPS};
use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, GroupCount, MailContact, Member, RecipientRow};

/// Column list for `members` queries.
const COLUMNS: &str = "\
    id, member_name, email, id_group, additional_groups, id_post_group, posts, \
    language, karma_good, karma_bad, buddy_list, is_activated, \
    notify_announcements, notify_regularity, created_at";

pub struct MemberRepo;

impl MemberRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM members WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Insert a member and record it as the latest member.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO members \
                (member_name, email, id_group, additional_groups, posts, language, notify_regularity) \
             VALUES ($1, $2, COALESCE($3, 0), COALESCE($4, '{{}}'), COALESCE($5, 0), \
                     COALESCE($6, ''), COALESCE($7, 1)) \
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, Member>(&query)
            .bind(&input.member_name)
            .bind(&input.email)
            .bind(input.id_group)
            .bind(input.additional_groups.as_deref())
            .bind(input.posts)
            .bind(input.language.as_deref())
            .bind(input.notify_regularity)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO settings (variable, value) VALUES ('latest_member', $1) \
             ON CONFLICT (variable) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(member.id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(member)
    }

    /// Highest member id, or 0 for an empty table.
    pub async fn max_id(pool: &PgPool) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT COALESCE(MAX(id), 0) FROM members")
            .fetch_one(pool)
            .await
    }

    /// Replace a member's stored buddy list.
    pub async fn set_buddy_list(
        pool: &PgPool,
        member_id: DbId,
        buddies: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE members SET buddy_list = $2 WHERE id = $1")
            .bind(member_id)
            .bind(buddies)
            .execute(pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Announcements
    // -----------------------------------------------------------------------

    /// Selectable announcement groups with their member counts.
    ///
    /// Regular members (group 0) are listed first; pseudo-groups that are
    /// not assigned by membership are left out.
    pub async fn announce_groups(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT 0::BIGINT AS id, 'Regular Members' AS group_name, \
                    (SELECT COUNT(*) FROM members WHERE id_group = 0) AS num_members \
             UNION ALL \
             SELECT g.id, g.group_name, \
                    (SELECT COUNT(*) FROM members m \
                     WHERE m.id_group = g.id OR m.id_post_group = g.id \
                        OR g.id = ANY(m.additional_groups)) AS num_members \
             FROM membergroups g \
             WHERE g.id <> ALL($1) \
             ORDER BY id",
        )
        .bind(NON_ANNOUNCEABLE_GROUPS)
        .fetch_all(pool)
        .await
    }

    /// One page of announcement recipients after `start`, ascending by id.
    pub async fn announce_recipients(
        pool: &PgPool,
        groups: &[DbId],
        start: DbId,
        limit: i64,
    ) -> Result<Vec<RecipientRow>, sqlx::Error> {
        sqlx::query_as::<_, RecipientRow>(
            "SELECT id, email, language FROM members \
             WHERE id > $2 \
               AND is_activated AND notify_announcements \
               AND (id_group = ANY($1) OR id_post_group = ANY($1) \
                    OR additional_groups && $1) \
             ORDER BY id \
             LIMIT $3",
        )
        .bind(groups)
        .bind(start)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Contacts
    // -----------------------------------------------------------------------

    /// Activated administrators.
    pub async fn administrators(pool: &PgPool) -> Result<Vec<MailContact>, sqlx::Error> {
        sqlx::query_as::<_, MailContact>(
            "SELECT id, member_name, email, language FROM members \
             WHERE is_activated AND (id_group = $1 OR $1 = ANY(additional_groups)) \
             ORDER BY id",
        )
        .bind(GROUP_ADMIN)
        .fetch_all(pool)
        .await
    }

    pub async fn contacts(pool: &PgPool, ids: &[DbId]) -> Result<Vec<MailContact>, sqlx::Error> {
        sqlx::query_as::<_, MailContact>(
            "SELECT id, member_name, email, language FROM members \
             WHERE is_activated AND id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
