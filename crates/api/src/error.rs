use agora_core::error::CoreError;
use agora_core::xrds::xml_escape;
use agora_mail::MailError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::response::xml_response;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant aborts the request; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code, and a message safe to show the client.
type ErrorParts = (StatusCode, &'static str, String);

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_error_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Mail(MailError::Database(err)) => classify_sqlx_error(err),
            AppError::Mail(err) => {
                tracing::error!(error = %err, "Mail error");
                internal()
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }

    /// Render for a script client that asked for XML:
    /// `<smf><error code="CODE">message</error></smf>` with the same status.
    pub fn into_xml_response(self) -> Response {
        let (status, code, message) = self.parts();
        let mut response = xml_response(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <smf><error code=\"{code}\">{}</error></smf>",
            xml_escape(&message)
        ));
        *response.status_mut() = status;
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}

fn core_error_parts(core: &CoreError) -> ErrorParts {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        // Permission denied and a stale session token are both 403; the code
        // tells a client whether reloading the form can help.
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::SessionInvalid => (StatusCode::FORBIDDEN, "SESSION_INVALID", core.to_string()),
        CoreError::RateLimited(msg) => {
            (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg.clone())
        }
        CoreError::FeatureDisabled(feature) => (
            StatusCode::FORBIDDEN,
            "FEATURE_DISABLED",
            format!("The {feature} feature is disabled"),
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a sqlx error to status, code, and a message safe to show.
///
/// `RowNotFound` is 404 and a unique violation on a `uq_*` constraint is
/// 409; anything else is a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // 23505: unique_violation
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
