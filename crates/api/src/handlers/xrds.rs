//! `action=xrds`: OpenID relying-party discovery.

use agora_core::xrds::discovery_document;

use crate::response::Outcome;
use crate::state::AppState;

pub fn document(state: &AppState) -> Outcome {
    Outcome::Xrds(discovery_document(&state.urls))
}
