//! Repository for the `settings` table.

use agora_core::settings::ForumSettings;
use sqlx::PgPool;

use crate::models::setting::SettingRow;

pub struct SettingsRepo;

impl SettingsRepo {
    /// Load every setting into a typed [`ForumSettings`].
    pub async fn load(pool: &PgPool) -> Result<ForumSettings, sqlx::Error> {
        let rows = sqlx::query_as::<_, SettingRow>("SELECT variable, value FROM settings")
            .fetch_all(pool)
            .await?;
        Ok(ForumSettings::from_pairs(
            rows.iter().map(|r| (r.variable.as_str(), r.value.as_str())),
        ))
    }

    pub async fn get(pool: &PgPool, variable: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE variable = $1")
            .bind(variable)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite one setting.
    pub async fn set(pool: &PgPool, variable: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (variable, value) VALUES ($1, $2) \
             ON CONFLICT (variable) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(variable)
        .bind(value)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Overwrite a setting only if it still holds `expected`.
    ///
    /// Returns `false` when another writer got there first.
    pub async fn compare_and_set(
        pool: &PgPool,
        variable: &str,
        expected: &str,
        value: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE settings SET value = $3 WHERE variable = $1 AND value = $2")
                .bind(variable)
                .bind(expected)
                .bind(value)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
