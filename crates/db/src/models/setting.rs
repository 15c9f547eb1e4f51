use sqlx::FromRow;

/// A row from the `settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct SettingRow {
    pub variable: String,
    pub value: String,
}
