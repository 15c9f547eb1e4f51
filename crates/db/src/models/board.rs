use agora_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `boards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Board {
    pub id: DbId,
    pub id_cat: DbId,
    pub id_parent: Option<DbId>,
    pub id_profile: DbId,
    pub id_last_msg: DbId,
    pub name: String,
    pub board_order: i32,
}

/// Unapproved content waiting on one board.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingApproval {
    pub id_board: DbId,
    pub board_name: String,
    pub unapproved_topics: i64,
    pub unapproved_attachments: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoard {
    pub id_cat: DbId,
    pub id_parent: Option<DbId>,
    pub id_profile: Option<DbId>,
    pub name: String,
}
