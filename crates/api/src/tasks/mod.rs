//! The scheduled-task runner.
//!
//! Tasks live in `scheduled_tasks`. A run picks every enabled task that is
//! due, claims each one by moving its `next_time` forward with a
//! conditional update, and only runs the tasks it claimed, so two
//! concurrent triggers never run the same task twice.

pub mod approval;
pub mod digest;
pub mod maintenance;

use std::time::Instant;

use agora_core::digest::DigestPeriod;
use agora_core::scheduling::{next_task_time, select_due, TaskKind};
use agora_core::settings::{format_unix_time, keys, ForumSettings};
use agora_core::types::Timestamp;
use agora_core::urls::ForumUrl;
use agora_db::repositories::{ScheduledTaskRepo, SettingsRepo};
use agora_mail::{DrainReport, MailError, Mailer};
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}

/// What one runner invocation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// True when `next_task_time` was still in the future.
    pub skipped: bool,
    pub ran: Vec<TaskKind>,
    /// The `next_task_time` written afterwards.
    pub next_task_time: Option<Timestamp>,
}

/// Everything a task needs.
pub struct TaskContext<'a> {
    pub pool: &'a PgPool,
    pub mailer: &'a Mailer,
    pub urls: &'a ForumUrl,
    pub settings: &'a ForumSettings,
    pub now: Timestamp,
}

/// Run every task due at `now`.
///
/// A task that fails is logged and the run continues with the next one.
/// Names the runner does not know are skipped with a warning, but their
/// `next_time` still moves forward.
pub async fn run_due(
    pool: &PgPool,
    mailer: &Mailer,
    urls: &ForumUrl,
    now: Timestamp,
) -> Result<RunReport, TaskError> {
    let settings = SettingsRepo::load(pool).await?;
    if settings.next_task_time.is_some_and(|t| t > now) {
        return Ok(RunReport {
            skipped: true,
            ..RunReport::default()
        });
    }

    let tasks = ScheduledTaskRepo::list(pool).await?;
    let ctx = TaskContext {
        pool,
        mailer,
        urls,
        settings: &settings,
        now,
    };
    let mut report = RunReport::default();

    for task in select_due(&tasks, now) {
        let next = task.schedule().next_run_after(now);
        if !ScheduledTaskRepo::claim(pool, task.id, task.next_time, next).await? {
            tracing::debug!(task = %task.task, "Task claimed by another runner");
            continue;
        }

        let Some(kind) = TaskKind::parse(&task.task) else {
            tracing::warn!(task = %task.task, "Skipping unknown scheduled task");
            continue;
        };

        let started = Instant::now();
        if let Err(e) = run_task(&ctx, kind).await {
            tracing::error!(task = kind.as_str(), error = %e, "Scheduled task failed");
        }
        let elapsed_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        ScheduledTaskRepo::log_run(pool, task.id, now, elapsed_ms).await?;
        tracing::info!(task = kind.as_str(), elapsed_ms, next_time = %next, "Scheduled task ran");
        report.ran.push(kind);
    }

    let earliest = ScheduledTaskRepo::earliest_next_time(pool).await?;
    let next = next_task_time(earliest, now);
    SettingsRepo::set(pool, keys::NEXT_TASK_TIME, &format_unix_time(Some(next))).await?;
    report.next_task_time = Some(next);

    Ok(report)
}

async fn run_task(ctx: &TaskContext<'_>, kind: TaskKind) -> Result<(), TaskError> {
    match kind {
        TaskKind::DailyMaintenance => maintenance::daily(ctx).await,
        TaskKind::WeeklyMaintenance => maintenance::weekly(ctx).await,
        TaskKind::DailyDigest => digest::send(ctx, DigestPeriod::Daily).await.map(|_| ()),
        TaskKind::WeeklyDigest => digest::send(ctx, DigestPeriod::Weekly).await.map(|_| ()),
        TaskKind::ApprovalNotification => approval::notify_moderators(ctx).await.map(|_| ()),
    }
}

/// Drain one batch from the mail queue if a send is due.
///
/// Returns `None` when the queue is idle or the next send is later.
pub async fn drain_mail_if_due(
    pool: &PgPool,
    mailer: &Mailer,
    settings: &ForumSettings,
    now: Timestamp,
) -> Result<Option<DrainReport>, TaskError> {
    match settings.mail_next_send {
        Some(due) if due <= now => Ok(Some(
            mailer.drain_queue(pool, settings.mail_batch_size, now).await?,
        )),
        _ => Ok(None),
    }
}
