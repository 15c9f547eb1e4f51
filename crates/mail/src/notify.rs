//! Topic event notifications.
//!
//! Subscribers of a topic (or of its board) hear about lock, unlock,
//! sticky, and remove events. Instant subscribers get a mail in their own
//! language; daily and weekly subscribers get a `log_digest` entry that a
//! digest task picks up later.

use agora_core::digest::{NoteType, NotifyRegularity};
use agora_core::mail_template::{render, MailTemplate};
use agora_core::settings::ForumSettings;
use agora_core::types::DbId;
use agora_core::urls::ForumUrl;
use agora_db::models::mail_queue::{NewMail, PRIORITY_NORMAL};
use agora_db::models::notify::{NewDigestEntry, Subscriber};
use agora_db::repositories::NotifyRepo;
use sqlx::PgPool;

use crate::error::MailError;
use crate::mailer::Mailer;

/// One event on one topic.
#[derive(Debug, Clone, Copy)]
pub struct TopicEvent<'a> {
    pub topic_id: DbId,
    pub board_id: DbId,
    pub subject: &'a str,
    pub note: NoteType,
    pub actor_id: DbId,
    pub actor_name: &'a str,
}

/// Who gets what for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyPlan {
    pub mails: Vec<NewMail>,
    /// Digest subscribers to write entries for.
    pub digest_members: Vec<DbId>,
    /// First-only subscribers whose subscription must be flagged as sent.
    pub first_only: Vec<DbId>,
}

/// Split subscribers into instant mail and digest entries.
pub fn plan(
    subscribers: &[Subscriber],
    event: &TopicEvent<'_>,
    settings: &ForumSettings,
    urls: &ForumUrl,
) -> NotifyPlan {
    let mut plan = NotifyPlan::default();
    let template = MailTemplate::for_note(event.note);
    let topic_link = urls.topic(event.topic_id, 0);
    let unsubscribe = urls.action(
        "notify",
        &[("topic", event.topic_id.to_string()), ("sa", "off".to_string())],
    );

    for sub in subscribers {
        if sub.id_member == event.actor_id {
            continue;
        }
        let regularity = sub.regularity();
        if regularity.is_instant() {
            let language = if sub.language.is_empty() {
                settings.default_language.as_str()
            } else {
                sub.language.as_str()
            };
            let mail = render(
                template,
                language,
                &[
                    ("TOPICSUBJECT", event.subject),
                    ("TOPICLINK", topic_link.as_str()),
                    ("UNSUBSCRIBELINK", unsubscribe.as_str()),
                    ("POSTERNAME", event.actor_name),
                    ("FORUMNAME", settings.forum_name.as_str()),
                ],
            );
            plan.mails.push(NewMail {
                recipient: sub.email.clone(),
                subject: mail.subject,
                body: mail.body,
                priority: PRIORITY_NORMAL,
            });
            if regularity == NotifyRegularity::FirstOnly {
                plan.first_only.push(sub.id_member);
            }
        } else if regularity.is_digest() {
            plan.digest_members.push(sub.id_member);
        }
    }
    plan
}

/// Counts for one dispatched event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub mailed: usize,
    pub digested: usize,
}

/// Notify everyone watching the event's topic or board, except the actor.
pub async fn notify_topic(
    pool: &PgPool,
    mailer: &Mailer,
    settings: &ForumSettings,
    urls: &ForumUrl,
    event: TopicEvent<'_>,
) -> Result<NotifyReport, MailError> {
    let subscribers =
        NotifyRepo::subscribers(pool, event.topic_id, event.board_id, event.actor_id).await?;
    if subscribers.is_empty() {
        return Ok(NotifyReport::default());
    }

    let plan = plan(&subscribers, &event, settings, urls);
    let report = NotifyReport {
        mailed: plan.mails.len(),
        digested: plan.digest_members.len(),
    };

    let entries: Vec<NewDigestEntry> = plan
        .digest_members
        .iter()
        .map(|&id_member| NewDigestEntry {
            id_member,
            id_topic: event.topic_id,
            id_board: event.board_id,
            subject: event.subject,
            note_type: event.note,
        })
        .collect();
    NotifyRepo::add_digest_entries(pool, &entries).await?;

    if !plan.first_only.is_empty() {
        NotifyRepo::mark_sent(pool, &plan.first_only, event.topic_id, event.board_id).await?;
    }

    mailer.deliver(pool, settings.mail_queue, plan.mails).await?;

    tracing::info!(
        topic_id = event.topic_id,
        note = event.note.as_str(),
        mailed = report.mailed,
        digested = report.digested,
        "Topic notification dispatched"
    );
    Ok(report)
}
