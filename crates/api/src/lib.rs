//! Agora front controller.
//!
//! Exposes config, state, error mapping, the action handlers, and the
//! scheduled-task runner so integration tests and the binary entrypoint
//! share them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod tasks;
