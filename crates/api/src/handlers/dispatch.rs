//! The front controller: `GET|POST /index.php` and `/`.

use agora_core::actions::Action;
use agora_core::request::{RequestContext, RequestParams};
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, AppResult};
use crate::handlers::{
    announce, attachment, board_index, buddy, karma, mark_read, scheduled, topic, xrds,
};
use crate::middleware::auth::AuthSession;
use crate::response::Outcome;
use crate::state::AppState;

/// Merge query and form parameters, resolve the action, and run it.
///
/// Form values are appended after query values, so a field present in
/// both takes the form's value. Requests carrying `xml` get redirects and
/// errors as XML documents, including a rejected `Authorization` header.
pub async fn front_controller(
    State(state): State<AppState>,
    session: Result<AuthSession, AppError>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let mut params = RequestParams::parse(query.as_deref().unwrap_or_default());
    let form = std::str::from_utf8(&body);
    if let Ok(form) = form {
        if !form.is_empty() {
            params.merge(RequestParams::parse(form));
        }
    }
    let xml = params.has("xml");

    let result = match (session, form) {
        (Err(err), _) => Err(err),
        (Ok(_), Err(_)) => Err(AppError::BadRequest("Form body is not valid UTF-8".into())),
        (Ok(session), Ok(_)) => {
            let ctx = RequestContext::new(session.actor, params, session.token);
            run(&state, &ctx).await
        }
    };

    match result {
        Ok(outcome) => outcome.render(xml),
        Err(err) if xml => err.into_xml_response(),
        Err(err) => err.into_response(),
    }
}

async fn run(state: &AppState, ctx: &RequestContext) -> AppResult<Outcome> {
    let action = Action::resolve(&ctx.params);
    tracing::debug!(
        action = action.name(),
        member_id = ?ctx.actor.member_id(),
        "Dispatching request"
    );

    match action {
        Action::BoardIndex => board_index::show(state, ctx).await,
        Action::Topic(sa) => topic::handle(state, ctx, sa).await,
        Action::Karma(sa) => karma::handle(state, ctx, sa).await,
        Action::Buddy(sa) => buddy::handle(state, ctx, sa).await,
        Action::MarkRead(sa) => mark_read::handle(state, ctx, sa).await,
        Action::Announce(sa) => announce::handle(state, ctx, sa).await,
        Action::AttachApprove(sa) => attachment::handle(state, ctx, sa).await,
        Action::Scheduled(trigger) => Ok(scheduled::handle(state, trigger).await),
        Action::Xrds => Ok(xrds::document(state)),
    }
}
