//! Domain logic for the Agora forum action service.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! repository layer, the mail crate, and the API server. Everything that
//! decides *what* a request is allowed to do lives here; everything that
//! touches storage or the network lives in the other crates.

pub mod actions;
pub mod announce;
pub mod buddies;
pub mod digest;
pub mod error;
pub mod groups;
pub mod karma;
pub mod lock;
pub mod mail_template;
pub mod permissions;
pub mod request;
pub mod scheduling;
pub mod settings;
pub mod types;
pub mod urls;
pub mod xrds;
