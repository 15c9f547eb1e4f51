//! Request extractors.
//!
//! - [`auth::AuthSession`] -- the acting member (or guest) and the session
//!   token from an optional JWT Bearer token.

pub mod auth;
