//! `action=karma`: applaud or smite another member.

use agora_core::actions::KarmaSubAction;
use agora_core::error::CoreError;
use agora_core::karma::{self, KarmaDirection, KarmaPolicy};
use agora_core::permissions::Permission;
use agora_core::request::RequestContext;
use agora_db::repositories::{KarmaRepo, MemberRepo, SettingsRepo};
use chrono::Utc;

use crate::error::AppResult;
use crate::handlers::{acting_member, general_permissions};
use crate::response::Outcome;
use crate::state::AppState;

/// Apply one karma point, subject to the per-pair wait window.
pub async fn handle(
    state: &AppState,
    ctx: &RequestContext,
    sa: KarmaSubAction,
) -> AppResult<Outcome> {
    let me = acting_member(&state.pool, ctx).await?;

    let settings = SettingsRepo::load(&state.pool).await?;
    if !settings.karma_enabled() {
        return Err(CoreError::FeatureDisabled("karma").into());
    }

    let permissions = general_permissions(&state.pool, &me).await?;
    permissions.require(Permission::KarmaEdit)?;
    ctx.require_session()?;

    let target = ctx
        .params
        .id("uid")
        .ok_or_else(|| CoreError::Validation("No member specified".into()))?;
    if target == me.id() {
        return Err(CoreError::Validation("You cannot change your own karma".into()).into());
    }
    if !MemberRepo::exists(&state.pool, target).await? {
        return Err(CoreError::NotFound {
            entity: "Member",
            id: target,
        }
        .into());
    }
    if i64::from(me.member.posts) < settings.karma_min_posts {
        return Err(CoreError::Forbidden(format!(
            "You need at least {} posts to change karma",
            settings.karma_min_posts
        ))
        .into());
    }

    let now = Utc::now();
    KarmaRepo::sweep(
        &state.pool,
        karma::sweep_cutoff(now, settings.karma_wait_time_hours),
    )
    .await?;

    let policy = KarmaPolicy::new(
        settings.karma_wait_time_hours,
        settings.karma_time_restrict_admins,
        permissions.allowed(Permission::ModerateForum),
    );
    let prior = KarmaRepo::find(&state.pool, me.id(), target)
        .await?
        .and_then(|log| log.prior());
    let direction = KarmaDirection::from(sa);
    let change = karma::decide(policy, prior, direction, now).map_err(CoreError::from)?;

    let totals = KarmaRepo::apply(&state.pool, me.id(), target, change, now).await?;
    tracing::info!(
        member_id = me.id(),
        target,
        change = ?change,
        karma_good = totals.karma_good,
        karma_bad = totals.karma_bad,
        "Karma changed"
    );

    if ctx.wants_xml() {
        return Ok(Outcome::Xml(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <smf><karma id=\"{target}\" good=\"{}\" bad=\"{}\"/></smf>",
            totals.karma_good, totals.karma_bad
        )));
    }

    let url = match ctx.params.topic_ref() {
        Some(topic) => state.urls.topic(topic.id, topic.start),
        None => state.urls.profile(target),
    };
    Ok(Outcome::Redirect(url))
}
