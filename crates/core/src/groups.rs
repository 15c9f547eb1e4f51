//! Well-known membergroup ids and role names.
//!
//! The group ids must match the seed data in
//! `20261001000002_create_members.sql`.

use crate::types::DbId;

/// Role claim carried by administrator access tokens.
pub const ROLE_ADMIN: &str = "admin";

/// Role claim carried by every other member token.
pub const ROLE_MEMBER: &str = "member";

/// Pseudo-group for visitors without an account. Never stored.
pub const GROUP_GUEST: DbId = -1;

/// Pseudo-group for members without a primary group.
pub const GROUP_REGULAR: DbId = 0;

/// Administrators hold every permission.
pub const GROUP_ADMIN: DbId = 1;

pub const GROUP_GLOBAL_MODERATOR: DbId = 2;

/// Board moderators are granted through the `moderators` table, not by
/// membership, so this group is excluded from announcement targets.
pub const GROUP_MODERATOR: DbId = 3;

/// Groups that may not be chosen as announcement recipients.
pub const NON_ANNOUNCEABLE_GROUPS: &[DbId] = &[GROUP_GUEST, GROUP_MODERATOR];
