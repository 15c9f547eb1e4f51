//! Forum runtime settings stored in the `settings` table.
//!
//! Values are stored as text. Missing or unparsable values fall back to
//! the defaults below so a partially seeded table still yields a usable
//! configuration.

use chrono::DateTime;

use crate::karma::MAX_WAIT_HOURS;
use crate::types::{DbId, Timestamp};

/// Setting keys written back by the service.
pub mod keys {
    pub const NEXT_TASK_TIME: &str = "next_task_time";
    pub const MAIL_NEXT_SEND: &str = "mail_next_send";
    pub const LATEST_MEMBER: &str = "latest_member";
}

/// Default karma wait window in hours.
const DEFAULT_KARMA_WAIT_HOURS: i64 = 1;

/// Longest log retention honoured, in days.
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Default number of queued mails sent per drain.
const DEFAULT_MAIL_BATCH_SIZE: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ForumSettings {
    pub forum_name: String,
    pub default_language: String,
    /// 0 disables karma entirely.
    pub karma_mode: i64,
    pub karma_wait_time_hours: i64,
    pub karma_min_posts: i64,
    pub karma_time_restrict_admins: bool,
    pub recycle_enable: bool,
    pub recycle_board: Option<DbId>,
    /// Queue outgoing mail instead of sending inline.
    pub mail_queue: bool,
    pub mail_batch_size: i64,
    pub mail_next_send: Option<Timestamp>,
    pub next_task_time: Option<Timestamp>,
    pub latest_member: DbId,
    /// 0 keeps moderation log entries forever.
    pub prune_mod_log_days: i64,
    /// 0 keeps scheduled task history forever.
    pub prune_task_log_days: i64,
}

impl Default for ForumSettings {
    fn default() -> Self {
        Self {
            forum_name: "Agora".to_string(),
            default_language: "english".to_string(),
            karma_mode: 0,
            karma_wait_time_hours: DEFAULT_KARMA_WAIT_HOURS,
            karma_min_posts: 0,
            karma_time_restrict_admins: true,
            recycle_enable: false,
            recycle_board: None,
            mail_queue: false,
            mail_batch_size: DEFAULT_MAIL_BATCH_SIZE,
            mail_next_send: None,
            next_task_time: None,
            latest_member: 0,
            prune_mod_log_days: 0,
            prune_task_log_days: 0,
        }
    }
}

impl ForumSettings {
    /// Build from `(variable, value)` rows. Unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut s = Self::default();
        for (key, value) in pairs {
            let value = value.trim();
            match key {
                "forum_name" if !value.is_empty() => s.forum_name = value.to_string(),
                "default_language" if !value.is_empty() => {
                    s.default_language = value.to_string()
                }
                "karma_mode" => s.karma_mode = int_or(value, s.karma_mode),
                "karma_wait_time" => {
                    s.karma_wait_time_hours =
                        int_or(value, s.karma_wait_time_hours).clamp(0, MAX_WAIT_HOURS)
                }
                "karma_min_posts" => s.karma_min_posts = int_or(value, s.karma_min_posts),
                "karma_time_restrict_admins" => s.karma_time_restrict_admins = flag(value),
                "recycle_enable" => s.recycle_enable = flag(value),
                "recycle_board" => s.recycle_board = value.parse().ok().filter(|id| *id > 0),
                "mail_queue" => s.mail_queue = flag(value),
                "mail_batch_size" => {
                    s.mail_batch_size = int_or(value, s.mail_batch_size).max(1)
                }
                keys::MAIL_NEXT_SEND => s.mail_next_send = unix_time(value),
                keys::NEXT_TASK_TIME => s.next_task_time = unix_time(value),
                keys::LATEST_MEMBER => s.latest_member = int_or(value, 0).max(0),
                "prune_mod_log_days" => {
                    s.prune_mod_log_days = retention(value, s.prune_mod_log_days)
                }
                "prune_task_log_days" => {
                    s.prune_task_log_days = retention(value, s.prune_task_log_days)
                }
                _ => {}
            }
        }
        s
    }

    pub fn karma_enabled(&self) -> bool {
        self.karma_mode != 0
    }

    /// The recycle board, when recycling is switched on.
    pub fn active_recycle_board(&self) -> Option<DbId> {
        if self.recycle_enable {
            self.recycle_board
        } else {
            None
        }
    }
}

/// Format a timestamp the way it is stored in `settings`.
pub fn format_unix_time(ts: Option<Timestamp>) -> String {
    ts.map(|t| t.timestamp()).unwrap_or(0).to_string()
}

fn int_or(value: &str, fallback: i64) -> i64 {
    value.parse().unwrap_or(fallback)
}

fn retention(value: &str, fallback: i64) -> i64 {
    int_or(value, fallback).clamp(0, MAX_RETENTION_DAYS)
}

fn flag(value: &str) -> bool {
    matches!(value, "1" | "true" | "on")
}

/// Stored unix seconds; 0 means unset.
fn unix_time(value: &str) -> Option<Timestamp> {
    value
        .parse::<i64>()
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
