//! Repository for `permissions`, `board_permissions`, and `moderators`.

use agora_core::groups::GROUP_MODERATOR;
use agora_core::permissions::PermissionSet;
use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::permission::PermissionRow;

pub struct PermissionRepo;

impl PermissionRepo {
    /// Forum-wide permissions for a set of groups.
    pub async fn general(pool: &PgPool, groups: &[DbId]) -> Result<PermissionSet, sqlx::Error> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT permission, add_deny FROM permissions WHERE id_group = ANY($1)",
        )
        .bind(groups)
        .fetch_all(pool)
        .await?;
        Ok(fold(&rows))
    }

    /// Permissions in one board: forum-wide rows plus the board profile's.
    ///
    /// A board moderator additionally gets the moderator group's board
    /// permissions for that board.
    pub async fn for_board(
        pool: &PgPool,
        board_id: DbId,
        member_id: DbId,
        groups: &[DbId],
    ) -> Result<PermissionSet, sqlx::Error> {
        let mut groups = groups.to_vec();
        if Self::is_moderator(pool, board_id, member_id).await? && !groups.contains(&GROUP_MODERATOR)
        {
            groups.push(GROUP_MODERATOR);
        }

        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT permission, add_deny FROM permissions WHERE id_group = ANY($2) \
             UNION ALL \
             SELECT bp.permission, bp.add_deny FROM board_permissions bp \
             JOIN boards b ON b.id_profile = bp.id_profile \
             WHERE b.id = $1 AND bp.id_group = ANY($2)",
        )
        .bind(board_id)
        .bind(&groups[..])
        .fetch_all(pool)
        .await?;
        Ok(fold(&rows))
    }

    pub async fn is_moderator(
        pool: &PgPool,
        board_id: DbId,
        member_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM moderators WHERE id_board = $1 AND id_member = $2)",
        )
        .bind(board_id)
        .bind(member_id)
        .fetch_one(pool)
        .await
    }

    pub async fn add_moderator(
        pool: &PgPool,
        board_id: DbId,
        member_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO moderators (id_board, id_member) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(board_id)
        .bind(member_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Moderator ids per board, for boards in `board_ids`.
    pub async fn moderators_of(
        pool: &PgPool,
        board_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT id_board, id_member FROM moderators WHERE id_board = ANY($1) \
             ORDER BY id_board, id_member",
        )
        .bind(board_ids)
        .fetch_all(pool)
        .await
    }
}

fn fold(rows: &[PermissionRow]) -> PermissionSet {
    PermissionSet::from_rows(rows.iter().map(|r| (r.permission.as_str(), !r.add_deny)))
}
