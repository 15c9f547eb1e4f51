//! Action handlers.
//!
//! [`dispatch`] is the front controller: it builds the per-request
//! context, resolves the action table, and hands off to one handler per
//! controller. Handlers run the permission gate before any mutation and
//! return an [`Outcome`](crate::response::Outcome).

pub mod announce;
pub mod attachment;
pub mod board_index;
pub mod buddy;
pub mod dispatch;
pub mod karma;
pub mod mark_read;
pub mod scheduled;
pub mod topic;
pub mod xrds;

use agora_core::error::CoreError;
use agora_core::groups::GROUP_ADMIN;
use agora_core::permissions::PermissionSet;
use agora_core::request::{ItemRef, RequestContext};
use agora_core::settings::ForumSettings;
use agora_core::types::DbId;
use agora_db::models::member::Member;
use agora_db::models::topic::Topic;
use agora_db::repositories::{MemberRepo, PermissionRepo, TopicRepo};
use agora_mail::notify::{notify_topic, TopicEvent};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The acting member's row plus whether they administer the forum.
#[derive(Debug, Clone)]
pub struct ActingMember {
    pub member: Member,
    pub is_admin: bool,
}

impl ActingMember {
    pub fn id(&self) -> DbId {
        self.member.id
    }
}

/// Require a member and load their row.
///
/// A token for a member that no longer exists is treated like a guest.
pub async fn acting_member(pool: &PgPool, ctx: &RequestContext) -> AppResult<ActingMember> {
    let actor = ctx.require_member()?;
    let member = MemberRepo::find_by_id(pool, actor.id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Unknown member".into()))?;
    let is_admin = actor.is_admin || member.group_ids().contains(&GROUP_ADMIN);
    Ok(ActingMember { member, is_admin })
}

/// Like [`acting_member`], but the session token is checked first, before
/// anything is read from storage.
pub async fn acting_member_with_session(
    pool: &PgPool,
    ctx: &RequestContext,
) -> AppResult<ActingMember> {
    ctx.require_member()?;
    ctx.require_session()?;
    acting_member(pool, ctx).await
}

/// Forum-wide permissions of the acting member.
pub async fn general_permissions(pool: &PgPool, me: &ActingMember) -> AppResult<PermissionSet> {
    if me.is_admin {
        return Ok(PermissionSet::administrator());
    }
    Ok(PermissionRepo::general(pool, &me.member.group_ids()).await?)
}

/// Permissions of the acting member inside one board.
pub async fn board_permissions(
    pool: &PgPool,
    me: &ActingMember,
    board_id: DbId,
) -> AppResult<PermissionSet> {
    if me.is_admin {
        return Ok(PermissionSet::administrator());
    }
    Ok(PermissionRepo::for_board(pool, board_id, me.id(), &me.member.group_ids()).await?)
}

/// The `topic=ID.START` parameter, which must be present.
pub fn topic_ref(ctx: &RequestContext) -> AppResult<ItemRef> {
    ctx.params
        .topic_ref()
        .ok_or_else(|| AppError::Core(CoreError::Validation("No topic specified".into())))
}

pub async fn load_topic(pool: &PgPool, id: DbId) -> AppResult<Topic> {
    TopicRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Topic", id }))
}

/// The subject of a topic's first message, or empty when it has none.
pub async fn topic_subject(pool: &PgPool, topic_id: DbId) -> AppResult<String> {
    Ok(TopicRepo::first_message(pool, topic_id)
        .await?
        .map(|m| m.subject)
        .unwrap_or_default())
}

/// Tell subscribers about a topic event.
///
/// Runs after the mutation has been committed, so a failure here is logged
/// and does not fail the request.
pub async fn notify(state: &AppState, settings: &ForumSettings, event: TopicEvent<'_>) {
    if let Err(e) = notify_topic(&state.pool, &state.mailer, settings, &state.urls, event).await {
        tracing::error!(
            topic_id = event.topic_id,
            note = event.note.as_str(),
            error = %e,
            "Topic notification failed"
        );
    }
}
