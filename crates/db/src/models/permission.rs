use sqlx::FromRow;

/// One grant or deny from `permissions` or `board_permissions`.
#[derive(Debug, Clone, FromRow)]
pub struct PermissionRow {
    pub permission: String,
    /// `false` denies the permission.
    pub add_deny: bool,
}
