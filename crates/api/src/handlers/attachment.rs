//! `action=attachapprove`: approve or reject attachments awaiting approval.

use agora_core::actions::AttachSubAction;
use agora_core::error::CoreError;
use agora_core::permissions::Permission;
use agora_core::request::RequestContext;
use agora_core::types::DbId;
use agora_db::models::attachment::AttachmentContext;
use agora_db::models::moderation::NewModerationLog;
use agora_db::repositories::{AttachmentRepo, ModerationLogRepo};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{acting_member_with_session, board_permissions};
use crate::response::Outcome;
use crate::state::AppState;

/// `aid=N` approves (or with `sa=reject`, deletes) one attachment;
/// `sa=all;mid=N` approves every attachment of a message.
pub async fn handle(
    state: &AppState,
    ctx: &RequestContext,
    sa: AttachSubAction,
) -> AppResult<Outcome> {
    let me = acting_member_with_session(&state.pool, ctx).await?;

    let attachments = match sa {
        AttachSubAction::All => {
            let msg_id = ctx
                .params
                .id("mid")
                .ok_or_else(|| CoreError::Validation("No message specified".into()))?;
            let found = AttachmentRepo::for_message(&state.pool, msg_id).await?;
            if found.is_empty() {
                return Err(CoreError::NotFound {
                    entity: "Message",
                    id: msg_id,
                }
                .into());
            }
            found
        }
        AttachSubAction::Approve | AttachSubAction::Reject => {
            let id = ctx
                .params
                .id("aid")
                .ok_or_else(|| CoreError::Validation("No attachment specified".into()))?;
            let found = AttachmentRepo::find_context(&state.pool, id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Attachment",
                    id,
                })?;
            vec![found]
        }
    };

    // Every attachment here belongs to the same message, hence one board.
    let AttachmentContext {
        id_msg,
        id_topic,
        id_board,
        ..
    } = attachments[0];
    board_permissions(&state.pool, &me, id_board)
        .await?
        .require(Permission::ApprovePosts)?;

    let ids: Vec<DbId> = attachments.iter().map(|a| a.id).collect();
    let filenames: Vec<&str> = attachments.iter().map(|a| a.filename.as_str()).collect();
    let (action, affected) = if sa == AttachSubAction::Reject {
        ("remove_attach", AttachmentRepo::delete(&state.pool, &ids).await?)
    } else {
        ("approve_attach", AttachmentRepo::approve(&state.pool, &ids).await?)
    };

    ModerationLogRepo::log(
        &state.pool,
        &NewModerationLog::topic(action, me.id(), id_board, id_topic)
            .with_msg(id_msg)
            .with_extra(json!({ "attachments": ids, "filenames": filenames })),
    )
    .await?;
    tracing::info!(member_id = me.id(), msg_id = id_msg, affected, action, "Attachments moderated");

    Ok(Outcome::Redirect(state.urls.topic_msg(id_topic, id_msg)))
}
