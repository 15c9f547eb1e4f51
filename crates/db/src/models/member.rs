//! Member rows and membergroup summaries.

use agora_core::announce::Recipient;
use agora_core::digest::NotifyRegularity;
use agora_core::groups::GROUP_REGULAR;
use agora_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub member_name: String,
    #[serde(skip)]
    pub email: String,
    pub id_group: DbId,
    pub additional_groups: Vec<DbId>,
    pub id_post_group: DbId,
    pub posts: i32,
    pub language: String,
    pub karma_good: i32,
    pub karma_bad: i32,
    pub buddy_list: Vec<DbId>,
    pub is_activated: bool,
    pub notify_announcements: bool,
    pub notify_regularity: i16,
    pub created_at: Timestamp,
}

impl Member {
    /// Every group the member's permissions come from.
    ///
    /// All members count as regular members in addition to their primary,
    /// post-count, and additional groups.
    pub fn group_ids(&self) -> Vec<DbId> {
        let mut groups = vec![GROUP_REGULAR];
        for id in [self.id_group, self.id_post_group]
            .into_iter()
            .chain(self.additional_groups.iter().copied())
        {
            if !groups.contains(&id) {
                groups.push(id);
            }
        }
        groups
    }

    pub fn regularity(&self) -> NotifyRegularity {
        NotifyRegularity::from_i16(self.notify_regularity)
    }
}

/// An announcement recipient.
#[derive(Debug, Clone, FromRow)]
pub struct RecipientRow {
    pub id: DbId,
    pub email: String,
    pub language: String,
}

impl From<RecipientRow> for Recipient {
    fn from(row: RecipientRow) -> Self {
        Recipient {
            id: row.id,
            email: row.email,
            language: row.language,
        }
    }
}

/// A membergroup with the number of members in it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupCount {
    pub id: DbId,
    pub group_name: String,
    pub num_members: i64,
}

/// A member to mail, with name and language for templating.
#[derive(Debug, Clone, FromRow)]
pub struct MailContact {
    pub id: DbId,
    pub member_name: String,
    pub email: String,
    pub language: String,
}

// ---------------------------------------------------------------------------
// Create DTOs
// ---------------------------------------------------------------------------

/// DTO for inserting a member. Registration itself happens elsewhere; this
/// exists for imports and tests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMember {
    pub member_name: String,
    pub email: String,
    pub id_group: Option<DbId>,
    pub additional_groups: Option<Vec<DbId>>,
    pub posts: Option<i32>,
    pub language: Option<String>,
    pub notify_regularity: Option<i16>,
}
