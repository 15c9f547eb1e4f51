//! `action=markasread`: board, all boards, or one topic back to unread.

use agora_core::actions::MarkReadSubAction;
use agora_core::error::CoreError;
use agora_core::request::RequestContext;
use agora_db::repositories::{BoardRepo, ReadLogRepo};

use crate::error::AppResult;
use crate::handlers::{acting_member, load_topic, topic_ref};
use crate::response::Outcome;
use crate::state::AppState;

pub async fn handle(
    state: &AppState,
    ctx: &RequestContext,
    sa: MarkReadSubAction,
) -> AppResult<Outcome> {
    if sa == MarkReadSubAction::All {
        ctx.require_member()?;
        ctx.require_session()?;
    }
    let me = acting_member(&state.pool, ctx).await?;

    match sa {
        MarkReadSubAction::All => {
            let boards = BoardRepo::list(&state.pool).await?;
            ReadLogRepo::mark_boards_read(&state.pool, me.id(), &boards).await?;
            tracing::info!(member_id = me.id(), boards = boards.len(), "Marked all boards read");
            Ok(Outcome::Redirect(state.urls.board_index()))
        }
        MarkReadSubAction::Board => {
            let board_id = ctx
                .params
                .board_ref()
                .map(|b| b.id)
                .ok_or_else(|| CoreError::Validation("No board specified".into()))?;
            let boards = BoardRepo::with_descendants(&state.pool, board_id).await?;
            let Some(board) = boards.iter().find(|b| b.id == board_id) else {
                return Err(CoreError::NotFound {
                    entity: "Board",
                    id: board_id,
                }
                .into());
            };
            let parent = board.id_parent;

            ReadLogRepo::mark_boards_read(&state.pool, me.id(), &boards).await?;
            tracing::debug!(member_id = me.id(), board_id, boards = boards.len(), "Marked board read");

            let url = match parent {
                Some(parent) => state.urls.board(parent, 0),
                None => state.urls.board_index(),
            };
            Ok(Outcome::Redirect(url))
        }
        MarkReadSubAction::Topic => {
            let target = topic_ref(ctx)?;
            let topic = load_topic(&state.pool, target.id).await?;
            ReadLogRepo::mark_topic_unread(&state.pool, me.id(), &topic).await?;
            tracing::debug!(member_id = me.id(), topic_id = topic.id, "Marked topic unread");
            Ok(Outcome::Redirect(state.urls.board(topic.id_board, 0)))
        }
    }
}
