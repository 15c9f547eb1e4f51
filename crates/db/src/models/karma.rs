use agora_core::karma::{KarmaDirection, KarmaPrior};
use agora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `log_karma` table.
#[derive(Debug, Clone, FromRow)]
pub struct KarmaLog {
    pub id_target: DbId,
    pub id_executor: DbId,
    pub action: i16,
    pub log_time: Timestamp,
}

impl KarmaLog {
    /// `None` for a row with an action outside {-1, 1}.
    pub fn prior(&self) -> Option<KarmaPrior> {
        KarmaDirection::from_i16(self.action).map(|direction| KarmaPrior {
            direction,
            log_time: self.log_time,
        })
    }
}

/// A member's karma counters after a change.
#[derive(Debug, Clone, Copy, FromRow, Serialize, PartialEq, Eq)]
pub struct KarmaTotals {
    pub karma_good: i32,
    pub karma_bad: i32,
}
