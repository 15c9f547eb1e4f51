use agora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `moderation_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModerationLogEntry {
    pub id: DbId,
    pub action: String,
    pub id_member: DbId,
    pub id_board: DbId,
    pub id_topic: DbId,
    pub id_msg: DbId,
    pub extra: serde_json::Value,
    pub log_time: Timestamp,
}

/// DTO for appending to the moderation log.
#[derive(Debug, Clone)]
pub struct NewModerationLog<'a> {
    pub action: &'a str,
    pub id_member: DbId,
    pub id_board: DbId,
    pub id_topic: DbId,
    pub id_msg: DbId,
    pub extra: serde_json::Value,
}

impl<'a> NewModerationLog<'a> {
    pub fn topic(action: &'a str, id_member: DbId, id_board: DbId, id_topic: DbId) -> Self {
        Self {
            action,
            id_member,
            id_board,
            id_topic,
            id_msg: 0,
            extra: serde_json::json!({}),
        }
    }

    pub fn with_msg(mut self, id_msg: DbId) -> Self {
        self.id_msg = id_msg;
        self
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = extra;
        self
    }
}
