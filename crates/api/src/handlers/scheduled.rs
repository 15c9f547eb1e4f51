//! `action=scheduled`: the page-load trigger for background work.
//!
//! Browsers request this as an image, so it always answers with the blank
//! GIF; failures are logged, never shown.

use agora_core::actions::ScheduledTrigger;
use agora_db::repositories::SettingsRepo;
use chrono::Utc;

use crate::response::Outcome;
use crate::state::AppState;
use crate::tasks;

pub async fn handle(state: &AppState, trigger: ScheduledTrigger) -> Outcome {
    let now = Utc::now();
    match trigger {
        ScheduledTrigger::Tasks => {
            if let Err(e) = tasks::run_due(&state.pool, &state.mailer, &state.urls, now).await {
                tracing::error!(error = %e, "Scheduled task run failed");
            }
        }
        ScheduledTrigger::MailQueue => match SettingsRepo::load(&state.pool).await {
            Ok(settings) => {
                if let Err(e) = tasks::drain_mail_if_due(&state.pool, &state.mailer, &settings, now).await {
                    tracing::error!(error = %e, "Mail queue drain failed");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to load settings for mail queue"),
        },
    }
    Outcome::Gif
}
