//! Permission strings and the per-request permission set.
//!
//! Permissions are granted (or denied) to membergroups either globally or
//! through a board's permission profile. The repository layer loads the
//! raw `(permission, is_deny)` rows for the acting member; this module
//! folds them into a [`PermissionSet`] that handlers query before any
//! mutation.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::CoreError;

/// Every permission a controller in this service checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    LockOwn,
    LockAny,
    MakeSticky,
    RemoveOwn,
    RemoveAny,
    KarmaEdit,
    AnnounceTopic,
    ApprovePosts,
    ProfileIdentityOwn,
    ModerateForum,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::LockOwn,
        Permission::LockAny,
        Permission::MakeSticky,
        Permission::RemoveOwn,
        Permission::RemoveAny,
        Permission::KarmaEdit,
        Permission::AnnounceTopic,
        Permission::ApprovePosts,
        Permission::ProfileIdentityOwn,
        Permission::ModerateForum,
    ];

    /// The stable string stored in the `permissions` tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::LockOwn => "lock_own",
            Permission::LockAny => "lock_any",
            Permission::MakeSticky => "make_sticky",
            Permission::RemoveOwn => "remove_own",
            Permission::RemoveAny => "remove_any",
            Permission::KarmaEdit => "karma_edit",
            Permission::AnnounceTopic => "announce_topic",
            Permission::ApprovePosts => "approve_posts",
            Permission::ProfileIdentityOwn => "profile_identity_own",
            Permission::ModerateForum => "moderate_forum",
        }
    }

    /// Parse a stored permission string. Unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == value)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an actor acts on its own content or on anyone's.
///
/// Several permissions come in `_own` / `_any` pairs (`lock_own` /
/// `lock_any`, `remove_own` / `remove_any`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// Holds the `_any` permission; acts with moderator privilege.
    Any,
    /// Holds only the `_own` permission and owns the content.
    Own,
}

/// The effective permissions of one actor in one board context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    admin: bool,
    granted: BTreeSet<Permission>,
}

impl PermissionSet {
    /// An administrator set: every check passes.
    pub fn administrator() -> Self {
        Self {
            admin: true,
            granted: Permission::ALL.iter().copied().collect(),
        }
    }

    /// An empty set, as held by guests.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fold `(permission, is_deny)` rows into a set.
    ///
    /// A deny row for a permission removes it even if another group grants
    /// it. Unknown permission strings are ignored.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut granted = BTreeSet::new();
        let mut denied = BTreeSet::new();

        for (name, is_deny) in rows {
            let Some(permission) = Permission::parse(name) else {
                continue;
            };
            if is_deny {
                denied.insert(permission);
            } else {
                granted.insert(permission);
            }
        }

        granted.retain(|p| !denied.contains(p));
        Self {
            admin: false,
            granted,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn allowed(&self, permission: Permission) -> bool {
        self.admin || self.granted.contains(&permission)
    }

    pub fn allowed_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.allowed(*p))
    }

    /// Abort with `Forbidden` unless `permission` is held.
    pub fn require(&self, permission: Permission) -> Result<(), CoreError> {
        if self.allowed(permission) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Missing permission: {permission}"
            )))
        }
    }

    /// Resolve an `_own` / `_any` permission pair.
    ///
    /// Holding `any` wins; otherwise `own` applies only when the actor owns
    /// the content.
    pub fn authority(
        &self,
        any: Permission,
        own: Permission,
        is_owner: bool,
    ) -> Result<Authority, CoreError> {
        if self.allowed(any) {
            Ok(Authority::Any)
        } else if is_owner && self.allowed(own) {
            Ok(Authority::Own)
        } else {
            Err(CoreError::Forbidden(format!("Missing permission: {any}")))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.granted.iter().copied()
    }
}
