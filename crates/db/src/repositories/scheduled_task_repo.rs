//! Repository for `scheduled_tasks` and `log_scheduled_tasks`.

use agora_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::scheduled_task::ScheduledTask;

const COLUMNS: &str =
    "id, task, next_time, time_offset, time_regularity, time_unit, disabled";

pub struct ScheduledTaskRepo;

impl ScheduledTaskRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ScheduledTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scheduled_tasks ORDER BY next_time, id");
        sqlx::query_as::<_, ScheduledTask>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        task: &str,
    ) -> Result<Option<ScheduledTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scheduled_tasks WHERE task = $1");
        sqlx::query_as::<_, ScheduledTask>(&query)
            .bind(task)
            .fetch_optional(pool)
            .await
    }

    /// Claim a due run by moving `next_time` from `seen` to `next`.
    ///
    /// Only one concurrent runner can move it, so only the claimant runs
    /// the task.
    pub async fn claim(
        pool: &PgPool,
        id: DbId,
        seen: Timestamp,
        next: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scheduled_tasks SET next_time = $3 \
             WHERE id = $1 AND next_time = $2 AND NOT disabled",
        )
        .bind(id)
        .bind(seen)
        .bind(next)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_next_time(
        pool: &PgPool,
        id: DbId,
        next: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE scheduled_tasks SET next_time = $2 WHERE id = $1")
            .bind(id)
            .bind(next)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_disabled(pool: &PgPool, id: DbId, disabled: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE scheduled_tasks SET disabled = $2 WHERE id = $1")
            .bind(id)
            .bind(disabled)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Earliest `next_time` among enabled tasks.
    pub async fn earliest_next_time(pool: &PgPool) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Timestamp>>(
            "SELECT MIN(next_time) FROM scheduled_tasks WHERE NOT disabled",
        )
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Run history
    // -----------------------------------------------------------------------

    pub async fn log_run(
        pool: &PgPool,
        id: DbId,
        time_run: Timestamp,
        time_taken_ms: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO log_scheduled_tasks (id_task, time_run, time_taken_ms) \
             VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(time_run)
        .bind(time_taken_ms)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn run_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM log_scheduled_tasks WHERE id_task = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete run history recorded before `cutoff`. Returns rows removed.
    pub async fn prune_log(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM log_scheduled_tasks WHERE time_run < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
