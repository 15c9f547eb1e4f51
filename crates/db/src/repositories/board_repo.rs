//! Repository for the `boards` and `categories` tables.

use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::board::{Board, CreateBoard, PendingApproval};

/// Column list for `boards` queries.
const COLUMNS: &str = "id, id_cat, id_parent, id_profile, id_last_msg, name, board_order";

/// [`COLUMNS`] qualified with the `b` alias.
const B_COLUMNS: &str =
    "b.id, b.id_cat, b.id_parent, b.id_profile, b.id_last_msg, b.name, b.board_order";

pub struct BoardRepo;

impl BoardRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE id = $1");
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every board in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!(
            "SELECT {B_COLUMNS} FROM boards b JOIN categories c ON c.id = b.id_cat \
             ORDER BY c.cat_order, b.board_order, b.id"
        );
        sqlx::query_as::<_, Board>(&query).fetch_all(pool).await
    }

    /// `board_id` and every board below it.
    pub async fn with_descendants(pool: &PgPool, board_id: DbId) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!(
            "WITH RECURSIVE tree AS ( \
                 SELECT {COLUMNS} FROM boards WHERE id = $1 \
                 UNION ALL \
                 SELECT {B_COLUMNS} \
                 FROM boards b JOIN tree t ON b.id_parent = t.id \
             ) \
             SELECT {COLUMNS} FROM tree ORDER BY id"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create_category(pool: &PgPool, name: &str) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateBoard) -> Result<Board, sqlx::Error> {
        let query = format!(
            "INSERT INTO boards (id_cat, id_parent, id_profile, name) \
             VALUES ($1, $2, COALESCE($3, 1), $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(input.id_cat)
            .bind(input.id_parent)
            .bind(input.id_profile)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Boards with unapproved topics or attachments.
    pub async fn pending_approvals(pool: &PgPool) -> Result<Vec<PendingApproval>, sqlx::Error> {
        sqlx::query_as::<_, PendingApproval>(
            "SELECT b.id AS id_board, b.name AS board_name, \
                    (SELECT COUNT(*) FROM topics t \
                     WHERE t.id_board = b.id AND NOT t.approved) AS unapproved_topics, \
                    (SELECT COUNT(*) FROM attachments a JOIN messages m ON m.id = a.id_msg \
                     WHERE m.id_board = b.id AND NOT a.approved) AS unapproved_attachments \
             FROM boards b \
             ORDER BY b.id",
        )
        .fetch_all(pool)
        .await
        .map(|rows| {
            rows.into_iter()
                .filter(|r| r.unapproved_topics > 0 || r.unapproved_attachments > 0)
                .collect()
        })
    }
}
