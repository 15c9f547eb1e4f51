//! Optional JWT authentication for the front controller.

use agora_core::error::CoreError;
use agora_core::request::Actor;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Who is making the request, from the `Authorization` header.
///
/// A request without the header is a guest. A header that is present but
/// malformed or carries an invalid token is rejected rather than silently
/// downgraded to a guest.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub actor: Actor,
    /// The session token (`jti`) the client must echo back in `sesc`.
    pub token: Option<String>,
}

impl AuthSession {
    pub fn guest() -> Self {
        Self {
            actor: Actor::Guest,
            token: None,
        }
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get("authorization") else {
            return Ok(Self::guest());
        };

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(Self {
            actor: claims.actor(),
            token: Some(claims.jti),
        })
    }
}
