//! `action=topic`: display, lock, sticky, and remove.

use agora_core::actions::TopicSubAction;
use agora_core::digest::NoteType;
use agora_core::error::CoreError;
use agora_core::lock::{self, LockState};
use agora_core::permissions::{Authority, Permission, PermissionSet};
use agora_core::request::RequestContext;
use agora_db::models::moderation::NewModerationLog;
use agora_db::repositories::{BoardRepo, ModerationLogRepo, SettingsRepo, TopicRepo};
use agora_mail::notify::TopicEvent;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{
    acting_member, acting_member_with_session, board_permissions, load_topic, notify, topic_ref,
    topic_subject,
};
use crate::response::Outcome;
use crate::state::AppState;

pub async fn handle(
    state: &AppState,
    ctx: &RequestContext,
    sa: TopicSubAction,
) -> AppResult<Outcome> {
    match sa {
        TopicSubAction::Display => display(state, ctx).await,
        TopicSubAction::Lock => toggle_lock(state, ctx).await,
        TopicSubAction::Sticky => toggle_sticky(state, ctx).await,
        TopicSubAction::Remove => remove(state, ctx).await,
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Topic summary plus what the viewer may do with it.
async fn display(state: &AppState, ctx: &RequestContext) -> AppResult<Outcome> {
    let target = topic_ref(ctx)?;
    let topic = load_topic(&state.pool, target.id).await?;

    let permissions = if ctx.actor.is_guest() {
        PermissionSet::none()
    } else {
        let me = acting_member(&state.pool, ctx).await?;
        board_permissions(&state.pool, &me, topic.id_board).await?
    };
    if !topic.approved && !permissions.allowed(Permission::ApprovePosts) {
        return Err(CoreError::NotFound {
            entity: "Topic",
            id: topic.id,
        }
        .into());
    }

    let subject = topic_subject(&state.pool, topic.id).await?;
    let lock_state = topic.lock_state()?;
    let allowed: Vec<&str> = permissions.iter().map(Permission::as_str).collect();

    Ok(Outcome::page(
        "display",
        json!({
            "topic": topic,
            "subject": subject,
            "start": target.start,
            "lock_state": lock_state,
            "permissions": allowed,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Lock
// ---------------------------------------------------------------------------

/// Toggle the lock following the owner/moderator transition table.
///
/// The update is conditional on the lock value read here; if another
/// request changed it in between, this one fails with a conflict.
async fn toggle_lock(state: &AppState, ctx: &RequestContext) -> AppResult<Outcome> {
    let me = acting_member_with_session(&state.pool, ctx).await?;
    let target = topic_ref(ctx)?;
    let topic = load_topic(&state.pool, target.id).await?;

    let permissions = board_permissions(&state.pool, &me, topic.id_board).await?;
    let authority = permissions.authority(
        Permission::LockAny,
        Permission::LockOwn,
        topic.is_started_by(me.id()),
    )?;

    let current = topic.lock_state()?;
    let next = lock::toggle(current, authority).map_err(CoreError::from)?;
    if !TopicRepo::set_locked(&state.pool, topic.id, current, next).await? {
        return Err(CoreError::Conflict("The topic was changed by another request".into()).into());
    }

    let event = lock::event_name(next);
    if authority == Authority::Any {
        ModerationLogRepo::log(
            &state.pool,
            &NewModerationLog::topic(event, me.id(), topic.id_board, topic.id),
        )
        .await?;
    }

    tracing::info!(
        topic_id = topic.id,
        member_id = me.id(),
        from = ?current,
        to = ?next,
        "Topic lock toggled"
    );

    let settings = SettingsRepo::load(&state.pool).await?;
    let subject = topic_subject(&state.pool, topic.id).await?;
    let note = if next == LockState::Unlocked {
        NoteType::Unlock
    } else {
        NoteType::Lock
    };
    notify(
        state,
        &settings,
        TopicEvent {
            topic_id: topic.id,
            board_id: topic.id_board,
            subject: &subject,
            note,
            actor_id: me.id(),
            actor_name: &me.member.member_name,
        },
    )
    .await;

    Ok(Outcome::Redirect(state.urls.topic(topic.id, target.start)))
}

// ---------------------------------------------------------------------------
// Sticky
// ---------------------------------------------------------------------------

async fn toggle_sticky(state: &AppState, ctx: &RequestContext) -> AppResult<Outcome> {
    let me = acting_member_with_session(&state.pool, ctx).await?;
    let target = topic_ref(ctx)?;
    let topic = load_topic(&state.pool, target.id).await?;

    board_permissions(&state.pool, &me, topic.id_board)
        .await?
        .require(Permission::MakeSticky)?;

    if !TopicRepo::set_sticky(&state.pool, topic.id, topic.is_sticky).await? {
        return Err(CoreError::Conflict("The topic was changed by another request".into()).into());
    }
    let now_sticky = !topic.is_sticky;

    let action = if now_sticky { "sticky" } else { "unsticky" };
    ModerationLogRepo::log(
        &state.pool,
        &NewModerationLog::topic(action, me.id(), topic.id_board, topic.id),
    )
    .await?;
    tracing::info!(
        topic_id = topic.id,
        member_id = me.id(),
        sticky = now_sticky,
        "Topic sticky toggled"
    );

    if now_sticky {
        let settings = SettingsRepo::load(&state.pool).await?;
        let subject = topic_subject(&state.pool, topic.id).await?;
        notify(
            state,
            &settings,
            TopicEvent {
                topic_id: topic.id,
                board_id: topic.id_board,
                subject: &subject,
                note: NoteType::Sticky,
                actor_id: me.id(),
                actor_name: &me.member.member_name,
            },
        )
        .await;
    }

    Ok(Outcome::Redirect(state.urls.topic(topic.id, target.start)))
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

/// Move the topic to the recycle board, or delete it outright.
///
/// The topic is re-read right before the mutation. If it vanished the
/// request fails with not-found; if it now lives on a different board than
/// the one the client saw, with a conflict.
async fn remove(state: &AppState, ctx: &RequestContext) -> AppResult<Outcome> {
    let me = acting_member_with_session(&state.pool, ctx).await?;
    let target = topic_ref(ctx)?;
    let topic = load_topic(&state.pool, target.id).await?;

    board_permissions(&state.pool, &me, topic.id_board)
        .await?
        .authority(
            Permission::RemoveAny,
            Permission::RemoveOwn,
            topic.is_started_by(me.id()),
        )?;

    let settings = SettingsRepo::load(&state.pool).await?;
    let subject = topic_subject(&state.pool, topic.id).await?;

    let recycle_to = match settings.active_recycle_board() {
        Some(board) if board != topic.id_board => BoardRepo::find_by_id(&state.pool, board)
            .await?
            .map(|b| b.id),
        _ => None,
    };

    // Concurrence check.
    let current = load_topic(&state.pool, topic.id).await?;
    let seen_board = ctx.params.board_ref().map_or(topic.id_board, |b| b.id);
    if current.id_board != seen_board {
        return Err(CoreError::Conflict(format!(
            "Topic {} has moved to another board",
            topic.id
        ))
        .into());
    }

    // Subscribers hear about the removal while the topic still exists.
    notify(
        state,
        &settings,
        TopicEvent {
            topic_id: current.id,
            board_id: current.id_board,
            subject: &subject,
            note: NoteType::Remove,
            actor_id: me.id(),
            actor_name: &me.member.member_name,
        },
    )
    .await;

    let done = match recycle_to {
        Some(recycle) => {
            TopicRepo::move_to_board(&state.pool, current.id, current.id_board, recycle).await?
        }
        None => TopicRepo::delete(&state.pool, current.id, current.id_board).await?,
    };
    if !done {
        return Err(AppError::Core(CoreError::Conflict(
            "The topic was changed by another request".into(),
        )));
    }

    ModerationLogRepo::log(
        &state.pool,
        &NewModerationLog::topic("remove", me.id(), current.id_board, current.id).with_extra(
            json!({
                "subject": subject,
                "recycled_to": recycle_to,
            }),
        ),
    )
    .await?;

    tracing::info!(
        topic_id = current.id,
        board_id = current.id_board,
        member_id = me.id(),
        recycled_to = ?recycle_to,
        "Topic removed"
    );

    Ok(Outcome::Redirect(state.urls.board(current.id_board, 0)))
}
