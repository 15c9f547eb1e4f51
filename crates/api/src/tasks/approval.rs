//! Tell moderators what is waiting for approval.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use agora_core::mail_template::{render, MailTemplate};
use agora_core::types::DbId;
use agora_db::models::board::PendingApproval;
use agora_db::models::mail_queue::{NewMail, PRIORITY_NORMAL};
use agora_db::repositories::{BoardRepo, MemberRepo, PermissionRepo};

use super::{TaskContext, TaskError};

/// Mail each board moderator a summary of their boards, and each
/// administrator a summary of every board. Returns the number of mails.
pub async fn notify_moderators(ctx: &TaskContext<'_>) -> Result<usize, TaskError> {
    let pending = BoardRepo::pending_approvals(ctx.pool).await?;
    if pending.is_empty() {
        tracing::debug!("Nothing awaiting approval");
        return Ok(0);
    }

    let board_ids: Vec<DbId> = pending.iter().map(|p| p.id_board).collect();
    let mut per_member: BTreeMap<DbId, Vec<&PendingApproval>> = BTreeMap::new();
    for (board_id, member_id) in PermissionRepo::moderators_of(ctx.pool, &board_ids).await? {
        if let Some(p) = pending.iter().find(|p| p.id_board == board_id) {
            per_member.entry(member_id).or_default().push(p);
        }
    }

    let admins = MemberRepo::administrators(ctx.pool).await?;
    for admin in &admins {
        per_member.insert(admin.id, pending.iter().collect());
    }

    let member_ids: Vec<DbId> = per_member.keys().copied().collect();
    let contacts = MemberRepo::contacts(ctx.pool, &member_ids).await?;
    let approval_link = ctx
        .urls
        .action("moderate", &[("area", "postmod".to_string())]);

    let mut mails = Vec::with_capacity(contacts.len());
    for contact in &contacts {
        let Some(boards) = per_member.get(&contact.id) else {
            continue;
        };
        let language = if contact.language.is_empty() {
            ctx.settings.default_language.as_str()
        } else {
            contact.language.as_str()
        };
        let summary = summarize(boards);
        let mail = render(
            MailTemplate::ApprovalNotification,
            language,
            &[
                ("MEMBERNAME", contact.member_name.as_str()),
                ("SUMMARY", summary.as_str()),
                ("APPROVALLINK", approval_link.as_str()),
                ("FORUMNAME", ctx.settings.forum_name.as_str()),
            ],
        );
        mails.push(NewMail {
            recipient: contact.email.clone(),
            subject: mail.subject,
            body: mail.body,
            priority: PRIORITY_NORMAL,
        });
    }

    let count = mails.len();
    ctx.mailer
        .deliver(ctx.pool, ctx.settings.mail_queue, mails)
        .await?;
    tracing::info!(boards = pending.len(), mails = count, "Approval notifications sent");
    Ok(count)
}

fn summarize(boards: &[&PendingApproval]) -> String {
    let mut out = String::new();
    for p in boards {
        let _ = writeln!(
            out,
            "  * {}: {} topics, {} attachments",
            p.board_name, p.unapproved_topics, p.unapproved_attachments
        );
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_each_board() {
        let general = PendingApproval {
            id_board: 1,
            board_name: "General".into(),
            unapproved_topics: 2,
            unapproved_attachments: 0,
        };
        let news = PendingApproval {
            id_board: 2,
            board_name: "News".into(),
            unapproved_topics: 0,
            unapproved_attachments: 3,
        };
        assert_eq!(
            summarize(&[&general, &news]),
            "  * General: 2 topics, 0 attachments\n  * News: 0 topics, 3 attachments"
        );
    }
}
