//! Periodic scheduled-task runner and mail-queue drain.
//!
//! Does the same work as the `action=scheduled` trigger on a fixed
//! interval, so tasks run even when nobody is browsing the forum.

use std::time::Duration;

use agora_core::urls::ForumUrl;
use agora_db::repositories::SettingsRepo;
use agora_mail::Mailer;
use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::tasks;

/// Run until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    mailer: Mailer,
    urls: ForumUrl,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Task scheduler started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Task scheduler stopping");
                break;
            }
            _ = ticker.tick() => {
                tick(&pool, &mailer, &urls).await;
            }
        }
    }
}

async fn tick(pool: &PgPool, mailer: &Mailer, urls: &ForumUrl) {
    let now = Utc::now();

    match tasks::run_due(pool, mailer, urls, now).await {
        Ok(report) if !report.ran.is_empty() => {
            tracing::info!(ran = report.ran.len(), "Scheduler: tasks ran");
        }
        Ok(_) => tracing::debug!("Scheduler: no tasks due"),
        Err(e) => tracing::error!(error = %e, "Scheduler: task run failed"),
    }

    let settings = match SettingsRepo::load(pool).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Scheduler: failed to load settings");
            return;
        }
    };
    match tasks::drain_mail_if_due(pool, mailer, &settings, now).await {
        Ok(Some(report)) => tracing::debug!(sent = report.sent, "Scheduler: mail queue drained"),
        Ok(None) => {}
        Err(e) => tracing::error!(error = %e, "Scheduler: mail queue drain failed"),
    }
}
