//! Topic and message rows.

use agora_core::error::CoreError;
use agora_core::lock::LockState;
use agora_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `topics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Topic {
    pub id: DbId,
    pub id_board: DbId,
    pub id_member_started: DbId,
    pub id_first_msg: DbId,
    pub id_last_msg: DbId,
    pub locked: i16,
    pub is_sticky: bool,
    pub approved: bool,
    pub id_previous_board: Option<DbId>,
}

impl Topic {
    /// The stored lock value as a state. Unknown values are an error.
    pub fn lock_state(&self) -> Result<LockState, CoreError> {
        LockState::from_i16(self.locked).ok_or_else(|| {
            CoreError::Internal(format!(
                "Topic {} has invalid lock value {}",
                self.id, self.locked
            ))
        })
    }

    pub fn is_started_by(&self, member_id: DbId) -> bool {
        self.id_member_started != 0 && self.id_member_started == member_id
    }
}

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub id_topic: DbId,
    pub id_board: DbId,
    pub id_member: DbId,
    pub subject: String,
    pub body: String,
    pub approved: bool,
    pub poster_time: Timestamp,
}

/// DTO for inserting a topic together with its first message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTopic {
    pub id_board: DbId,
    pub id_member: DbId,
    pub subject: String,
    pub body: String,
    pub approved: Option<bool>,
}
