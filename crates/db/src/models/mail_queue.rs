use agora_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Priority for announcement mail; sent after everything else.
pub const PRIORITY_LOW: i16 = 5;

/// Priority for notifications and digests.
pub const PRIORITY_NORMAL: i16 = 3;

/// A row from the `mail_queue` table.
#[derive(Debug, Clone, FromRow)]
pub struct QueuedMail {
    pub id: DbId,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub priority: i16,
    pub attempts: i16,
    pub queued_at: Timestamp,
}

/// DTO for enqueueing one mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub priority: i16,
}
