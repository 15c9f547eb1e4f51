//! Daily and weekly housekeeping.

use agora_core::karma::sweep_cutoff;
use agora_core::types::Timestamp;
use agora_db::repositories::{KarmaRepo, ModerationLogRepo, ScheduledTaskRepo};
use chrono::Duration;

use super::{TaskContext, TaskError};

/// Drop karma log entries whose wait window has passed.
pub async fn daily(ctx: &TaskContext<'_>) -> Result<(), TaskError> {
    let cutoff = sweep_cutoff(ctx.now, ctx.settings.karma_wait_time_hours);
    let swept = KarmaRepo::sweep(ctx.pool, cutoff).await?;
    tracing::debug!(swept, "Karma log swept");
    Ok(())
}

/// Prune the moderation log and the task log. A retention of zero days
/// keeps everything.
pub async fn weekly(ctx: &TaskContext<'_>) -> Result<(), TaskError> {
    if let Some(cutoff) = retention_cutoff(ctx.now, ctx.settings.prune_mod_log_days) {
        let pruned = ModerationLogRepo::prune(ctx.pool, cutoff).await?;
        tracing::info!(pruned, "Moderation log pruned");
    }
    if let Some(cutoff) = retention_cutoff(ctx.now, ctx.settings.prune_task_log_days) {
        let pruned = ScheduledTaskRepo::prune_log(ctx.pool, cutoff).await?;
        tracing::info!(pruned, "Task log pruned");
    }
    Ok(())
}

/// `days` before `now`, or `None` when nothing should be pruned.
fn retention_cutoff(now: Timestamp, days: i64) -> Option<Timestamp> {
    if days <= 0 {
        return None;
    }
    let cutoff = Duration::try_days(days).and_then(|d| now.checked_sub_signed(d));
    if cutoff.is_none() {
        tracing::warn!(days, "Retention out of range, skipping prune");
    }
    cutoff
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn retention_cutoff_handles_extremes() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(retention_cutoff(now, 0), None);
        assert_eq!(retention_cutoff(now, -1), None);
        assert_eq!(
            retention_cutoff(now, 7),
            Some(Utc.with_ymd_and_hms(2026, 2, 22, 0, 0, 0).unwrap())
        );
        assert_eq!(retention_cutoff(now, i64::MAX), None);
    }
}
