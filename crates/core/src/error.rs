use crate::types::DbId;

/// Request-fatal error categories shared by every controller.
///
/// None of these are retried; the request is aborted and the category is
/// mapped to an HTTP status by the API layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Session verification failed")]
    SessionInvalid,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Feature disabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}
