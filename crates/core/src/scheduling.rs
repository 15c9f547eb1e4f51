//! Scheduled task timing and selection.
//!
//! Tasks carry an offset (seconds past midnight UTC), a regularity, and a
//! unit. Runs are aligned to `midnight + offset + k * interval`; the next
//! run is always the first aligned instant strictly after `now`.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::types::{DbId, Timestamp};

/// Persisted as `next_task_time` when no enabled task remains.
pub const FALLBACK_INTERVAL_HOURS: i64 = 24;

/// Longest interval between runs (about ten years).
pub const MAX_INTERVAL_SECS: i64 = 520 * 604_800;

// ---------------------------------------------------------------------------
// Units and schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    /// Parse the single-letter code stored in `scheduled_tasks.time_unit`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(TimeUnit::Minute),
            "h" => Some(TimeUnit::Hour),
            "d" => Some(TimeUnit::Day),
            "w" => Some(TimeUnit::Week),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::Week => "w",
        }
    }

    fn seconds(self) -> i64 {
        match self {
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 3_600,
            TimeUnit::Day => 86_400,
            TimeUnit::Week => 604_800,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSchedule {
    pub offset_secs: i64,
    pub regularity: i64,
    pub unit: TimeUnit,
}

impl TaskSchedule {
    /// Regularity below 1 is treated as 1; the result is capped at
    /// [`MAX_INTERVAL_SECS`].
    pub fn interval(&self) -> Duration {
        let secs = self
            .regularity
            .max(1)
            .saturating_mul(self.unit.seconds())
            .min(MAX_INTERVAL_SECS);
        Duration::seconds(secs)
    }

    /// The first aligned run strictly after `now`.
    pub fn next_run_after(&self, now: Timestamp) -> Timestamp {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let anchor = midnight + Duration::seconds(self.offset_secs.rem_euclid(86_400));
        let step = self.interval().num_seconds();
        let elapsed = (now - anchor).num_seconds();
        let k = elapsed.div_euclid(step) + 1;
        anchor
            .checked_add_signed(Duration::seconds(k.saturating_mul(step)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A row the runner can select from.
pub trait Schedulable {
    fn task_id(&self) -> DbId;
    fn next_time(&self) -> Timestamp;
    fn is_enabled(&self) -> bool;
}

/// Enabled tasks due at `now`, earliest first (ties by id).
pub fn select_due<T: Schedulable>(tasks: &[T], now: Timestamp) -> Vec<&T> {
    let mut due: Vec<&T> = tasks
        .iter()
        .filter(|t| t.is_enabled() && t.next_time() <= now)
        .collect();
    due.sort_by_key(|t| (t.next_time(), t.task_id()));
    due
}

/// The value to persist as `next_task_time` after a run.
///
/// The earliest pending run, or `now + 24h` when nothing is pending. Never
/// at or before `now`.
pub fn next_task_time<I>(pending: I, now: Timestamp) -> Timestamp
where
    I: IntoIterator<Item = Timestamp>,
{
    let floor = now + Duration::seconds(1);
    pending
        .into_iter()
        .min()
        .map(|t| t.max(floor))
        .unwrap_or_else(|| now + Duration::hours(FALLBACK_INTERVAL_HOURS))
}

// ---------------------------------------------------------------------------
// Task kinds
// ---------------------------------------------------------------------------

/// The tasks this service knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    DailyMaintenance,
    WeeklyMaintenance,
    DailyDigest,
    WeeklyDigest,
    ApprovalNotification,
}

impl TaskKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "daily_maintenance" => Some(TaskKind::DailyMaintenance),
            "weekly_maintenance" => Some(TaskKind::WeeklyMaintenance),
            "daily_digest" => Some(TaskKind::DailyDigest),
            "weekly_digest" => Some(TaskKind::WeeklyDigest),
            "approval_notification" => Some(TaskKind::ApprovalNotification),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::DailyMaintenance => "daily_maintenance",
            TaskKind::WeeklyMaintenance => "weekly_maintenance",
            TaskKind::DailyDigest => "daily_digest",
            TaskKind::WeeklyDigest => "weekly_digest",
            TaskKind::ApprovalNotification => "approval_notification",
        }
    }
}
