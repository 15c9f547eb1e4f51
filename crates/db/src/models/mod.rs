//! Row structs and insert DTOs.
//!
//! Each submodule holds a `FromRow` struct per query shape it serves and,
//! where rows are created by the service, a create DTO.

pub mod attachment;
pub mod board;
pub mod karma;
pub mod mail_queue;
pub mod member;
pub mod moderation;
pub mod notify;
pub mod permission;
pub mod scheduled_task;
pub mod setting;
pub mod topic;
