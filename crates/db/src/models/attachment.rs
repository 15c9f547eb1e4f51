use agora_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// An attachment together with where its message lives.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttachmentContext {
    pub id: DbId,
    pub id_msg: DbId,
    pub id_topic: DbId,
    pub id_board: DbId,
    pub filename: String,
    pub approved: bool,
}
