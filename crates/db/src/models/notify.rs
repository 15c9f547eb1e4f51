//! Subscription and digest rows.

use agora_core::digest::{DigestEntry, NoteType, NotifyRegularity};
use agora_core::types::DbId;
use sqlx::FromRow;

/// A member subscribed to a topic or its board.
#[derive(Debug, Clone, FromRow)]
pub struct Subscriber {
    pub id_member: DbId,
    pub member_name: String,
    pub email: String,
    pub language: String,
    pub notify_regularity: i16,
}

impl Subscriber {
    pub fn regularity(&self) -> NotifyRegularity {
        NotifyRegularity::from_i16(self.notify_regularity)
    }
}

/// One pending digest entry with the subscriber it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct DigestRow {
    pub id_member: DbId,
    pub member_name: String,
    pub email: String,
    pub language: String,
    pub id_topic: DbId,
    pub subject: String,
    pub board_name: String,
    pub note_type: String,
}

impl DigestRow {
    /// `None` for an unknown stored note type.
    pub fn entry(&self) -> Option<DigestEntry> {
        NoteType::parse(&self.note_type).map(|note_type| DigestEntry {
            topic_id: self.id_topic,
            board_name: self.board_name.clone(),
            subject: self.subject.clone(),
            note_type,
        })
    }
}

/// DTO for fanning one event out to a digest subscriber.
#[derive(Debug, Clone)]
pub struct NewDigestEntry<'a> {
    pub id_member: DbId,
    pub id_topic: DbId,
    pub id_board: DbId,
    pub subject: &'a str,
    pub note_type: NoteType,
}
