//! Daily and weekly digests of watched topics.
//!
//! Entries up to a high-water mark are read, grouped per member, and
//! mailed as one digest each; then the same range is closed out. Entries
//! written while the digest is being built have higher ids and wait for
//! the next run.

use agora_core::digest::{compose, DigestEntry, DigestPeriod};
use agora_core::mail_template::{render, MailTemplate};
use agora_db::models::mail_queue::{NewMail, PRIORITY_NORMAL};
use agora_db::models::notify::DigestRow;
use agora_db::repositories::NotifyRepo;

use super::{TaskContext, TaskError};

/// Mail every due digest for `period`. Returns the number of digests.
pub async fn send(ctx: &TaskContext<'_>, period: DigestPeriod) -> Result<usize, TaskError> {
    let high_water = NotifyRepo::digest_high_water(ctx.pool).await?;
    let rows = NotifyRepo::digest_rows(ctx.pool, period, high_water).await?;

    let mails = build_mails(&rows, period, &ctx.settings.forum_name, &ctx.settings.default_language);
    let count = mails.len();
    if count > 0 {
        ctx.mailer
            .deliver(ctx.pool, ctx.settings.mail_queue, mails)
            .await?;
    }

    let closed = NotifyRepo::finish_digest(ctx.pool, period, high_water).await?;
    tracing::info!(period = period.label(), digests = count, closed, "Digest sent");
    Ok(count)
}

/// One mail per member. Rows arrive ordered by member.
fn build_mails(
    rows: &[DigestRow],
    period: DigestPeriod,
    forum_name: &str,
    default_language: &str,
) -> Vec<NewMail> {
    let mut mails = Vec::new();
    for member_rows in rows.chunk_by(|a, b| a.id_member == b.id_member) {
        let first = &member_rows[0];
        let entries: Vec<DigestEntry> = member_rows.iter().filter_map(DigestRow::entry).collect();
        if entries.is_empty() {
            continue;
        }
        let language = if first.language.is_empty() {
            default_language
        } else {
            first.language.as_str()
        };
        let digest = compose(&entries);
        let mail = render(
            MailTemplate::Digest,
            language,
            &[
                ("MEMBERNAME", first.member_name.as_str()),
                ("PERIOD", period.label()),
                ("DIGEST", digest.as_str()),
                ("FORUMNAME", forum_name),
            ],
        );
        mails.push(NewMail {
            recipient: first.email.clone(),
            subject: mail.subject,
            body: mail.body,
            priority: PRIORITY_NORMAL,
        });
    }
    mails
}
