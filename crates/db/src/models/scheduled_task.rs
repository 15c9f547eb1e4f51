use agora_core::scheduling::{Schedulable, TaskSchedule, TimeUnit};
use agora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `scheduled_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduledTask {
    pub id: DbId,
    pub task: String,
    pub next_time: Timestamp,
    pub time_offset: i32,
    pub time_regularity: i32,
    pub time_unit: String,
    pub disabled: bool,
}

impl ScheduledTask {
    /// Unknown units fall back to days.
    pub fn schedule(&self) -> TaskSchedule {
        TaskSchedule {
            offset_secs: i64::from(self.time_offset),
            regularity: i64::from(self.time_regularity),
            unit: TimeUnit::from_code(&self.time_unit).unwrap_or(TimeUnit::Day),
        }
    }
}

impl Schedulable for ScheduledTask {
    fn task_id(&self) -> DbId {
        self.id
    }

    fn next_time(&self) -> Timestamp {
        self.next_time
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }
}
