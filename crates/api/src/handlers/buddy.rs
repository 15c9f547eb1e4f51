//! `action=buddy`: add or remove a member from the actor's buddy list.

use agora_core::actions::BuddySubAction;
use agora_core::buddies::{BuddyChange, BuddyList};
use agora_core::error::CoreError;
use agora_core::permissions::Permission;
use agora_core::request::RequestContext;
use agora_db::repositories::MemberRepo;

use crate::error::AppResult;
use crate::handlers::{acting_member_with_session, general_permissions};
use crate::response::Outcome;
use crate::state::AppState;

pub async fn handle(
    state: &AppState,
    ctx: &RequestContext,
    sa: BuddySubAction,
) -> AppResult<Outcome> {
    let me = acting_member_with_session(&state.pool, ctx).await?;
    general_permissions(&state.pool, &me)
        .await?
        .require(Permission::ProfileIdentityOwn)?;

    let target = ctx
        .params
        .id("u")
        .ok_or_else(|| CoreError::Validation("No member specified".into()))?;
    if !MemberRepo::exists(&state.pool, target).await? {
        return Err(CoreError::NotFound {
            entity: "Member",
            id: target,
        }
        .into());
    }

    let mut buddies = BuddyList::load(me.id(), &me.member.buddy_list);
    let change = match sa {
        BuddySubAction::Toggle => buddies.toggle(target),
        BuddySubAction::Add => buddies.add(target),
        BuddySubAction::Remove => buddies.remove(target),
    };

    if change != BuddyChange::Unchanged {
        MemberRepo::set_buddy_list(&state.pool, me.id(), buddies.as_slice()).await?;
        tracing::info!(member_id = me.id(), target, change = ?change, "Buddy list updated");
    }

    Ok(Outcome::Redirect(state.urls.profile(target)))
}
