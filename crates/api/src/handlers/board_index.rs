//! The default action: the board index.

use agora_core::request::RequestContext;
use agora_db::repositories::{BoardRepo, ReadLogRepo, SettingsRepo};
use serde_json::json;

use crate::error::AppResult;
use crate::response::Outcome;
use crate::state::AppState;

/// Every board, with the member's read marker on each.
pub async fn show(state: &AppState, ctx: &RequestContext) -> AppResult<Outcome> {
    let settings = SettingsRepo::load(&state.pool).await?;
    let boards = BoardRepo::list(&state.pool).await?;

    let mut entries = Vec::with_capacity(boards.len());
    for board in &boards {
        let read_up_to = match ctx.actor.member_id() {
            Some(member_id) => ReadLogRepo::board_mark(&state.pool, member_id, board.id).await?,
            None => None,
        };
        let unread = read_up_to.map_or(board.id_last_msg > 0, |m| m < board.id_last_msg);
        entries.push(json!({
            "board": board,
            "url": state.urls.board(board.id, 0),
            "unread": unread,
        }));
    }

    Ok(Outcome::page(
        "board_index",
        json!({
            "forum_name": settings.forum_name,
            "boards": entries,
        }),
    ))
}
