//! Access-token handling.
//!
//! Login and cookie sessions live outside this service; it only verifies
//! the bearer tokens issued there.

pub mod jwt;
