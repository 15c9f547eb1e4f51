//! `action=announce`: mail a topic to whole membergroups, one page of
//! members per request.
//!
//! The client drives the walk by echoing back the `start` cursor from the
//! previous page. Replaying a cursor sends that page again; nothing on the
//! server records which pages went out.

use agora_core::actions::AnnounceSubAction;
use agora_core::announce::{self, AnnounceProgress, Recipient};
use agora_core::error::CoreError;
use agora_core::groups::NON_ANNOUNCEABLE_GROUPS;
use agora_core::mail_template::{render, MailTemplate};
use agora_core::permissions::Permission;
use agora_core::request::{RequestContext, SESSION_PARAM};
use agora_core::types::DbId;
use agora_db::models::mail_queue::{NewMail, PRIORITY_LOW};
use agora_db::models::topic::Topic;
use agora_db::repositories::{MemberRepo, SettingsRepo, TopicRepo};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{
    acting_member, acting_member_with_session, board_permissions, load_topic, topic_ref,
    ActingMember,
};
use crate::response::Outcome;
use crate::state::AppState;

pub async fn handle(
    state: &AppState,
    ctx: &RequestContext,
    sa: AnnounceSubAction,
) -> AppResult<Outcome> {
    match sa {
        AnnounceSubAction::SelectGroup => {
            let me = acting_member(&state.pool, ctx).await?;
            select_group(state, ctx, &me).await
        }
        AnnounceSubAction::Send => {
            let me = acting_member_with_session(&state.pool, ctx).await?;
            send(state, ctx, &me).await
        }
    }
}

/// Load an approved topic the actor may announce.
async fn announceable_topic(
    state: &AppState,
    ctx: &RequestContext,
    me: &ActingMember,
) -> AppResult<Topic> {
    let topic = load_topic(&state.pool, topic_ref(ctx)?.id).await?;
    if !topic.approved {
        return Err(CoreError::NotFound {
            entity: "Topic",
            id: topic.id,
        }
        .into());
    }
    board_permissions(&state.pool, me, topic.id_board)
        .await?
        .require(Permission::AnnounceTopic)?;
    Ok(topic)
}

/// The group picker.
async fn select_group(
    state: &AppState,
    ctx: &RequestContext,
    me: &ActingMember,
) -> AppResult<Outcome> {
    let topic = announceable_topic(state, ctx, me).await?;
    let subject = TopicRepo::first_message(&state.pool, topic.id)
        .await?
        .map(|m| m.subject)
        .unwrap_or_default();
    let groups = MemberRepo::announce_groups(&state.pool).await?;

    Ok(Outcome::page(
        "announce_select_group",
        json!({
            "topic": topic.id,
            "subject": subject,
            "groups": groups,
            "session_var": SESSION_PARAM,
        }),
    ))
}

/// Selected group ids. Unlike other ids, group 0 (regular members) is valid.
fn selected_groups(ctx: &RequestContext) -> Vec<DbId> {
    let mut groups: Vec<DbId> = Vec::new();
    for id in ctx
        .params
        .get_all("who")
        .iter()
        .filter_map(|v| v.trim().parse::<DbId>().ok())
    {
        if id >= 0 && !NON_ANNOUNCEABLE_GROUPS.contains(&id) && !groups.contains(&id) {
            groups.push(id);
        }
    }
    groups
}

/// Send one page and report the cursor for the next request.
async fn send(state: &AppState, ctx: &RequestContext, me: &ActingMember) -> AppResult<Outcome> {
    let topic = announceable_topic(state, ctx, me).await?;

    let groups = selected_groups(ctx);
    if groups.is_empty() {
        return Err(CoreError::Validation("No membergroups selected".into()).into());
    }

    let settings = SettingsRepo::load(&state.pool).await?;
    let start = ctx.params.offset("start");
    let page: Vec<Recipient> = MemberRepo::announce_recipients(
        &state.pool,
        &groups,
        start,
        announce::page_size(settings.mail_queue),
    )
    .await?
    .into_iter()
    .map(Recipient::from)
    .collect();

    let Some(last_id) = page.last().map(|r| r.id) else {
        tracing::info!(topic_id = topic.id, member_id = me.id(), "Announcement complete");
        return Ok(Outcome::Redirect(state.urls.topic(topic.id, 0)));
    };

    let message = TopicRepo::first_message(&state.pool, topic.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Message",
            id: topic.id_first_msg,
        })?;
    let body = announce::plain_text(&message.body);
    let topic_link = state.urls.topic(topic.id, 0);

    let mut mails = Vec::with_capacity(page.len());
    for (language, recipients) in announce::group_by_language(&page, &settings.default_language) {
        let mail = render(
            MailTemplate::NewAnnouncement,
            &language,
            &[
                ("TOPICSUBJECT", message.subject.as_str()),
                ("MESSAGE", body.as_str()),
                ("TOPICLINK", topic_link.as_str()),
                ("FORUMNAME", settings.forum_name.as_str()),
            ],
        );
        mails.extend(recipients.into_iter().map(|r| NewMail {
            recipient: r.email.clone(),
            subject: mail.subject.clone(),
            body: mail.body.clone(),
            priority: PRIORITY_LOW,
        }));
    }

    let report = state
        .mailer
        .deliver(&state.pool, settings.mail_queue, mails)
        .await?;

    let progress = AnnounceProgress {
        start,
        percentage: announce::percentage(start, settings.latest_member),
        done: false,
    }
    .advance(last_id, settings.latest_member);

    tracing::info!(
        topic_id = topic.id,
        member_id = me.id(),
        start,
        next_start = progress.start,
        percentage = progress.percentage,
        queued = report.queued,
        sent = report.sent,
        failed = report.failed,
        "Announcement page sent"
    );

    Ok(Outcome::page(
        "announce_send",
        json!({
            "topic": topic.id,
            "groups": groups,
            "progress": progress,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use agora_core::request::{Actor, RequestParams};

    use super::*;

    #[test]
    fn group_zero_is_selectable_and_pseudo_groups_are_not() {
        let ctx = RequestContext::new(
            Actor::Guest,
            RequestParams::parse("who[]=0;who[]=3;who[]=-1;who[]=4;who[]=4;who[]=x"),
            None,
        );
        assert_eq!(selected_groups(&ctx), vec![0, 4]);
    }
}
