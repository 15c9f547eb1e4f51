//! Repository for `log_karma` and the member karma counters.

use agora_core::karma::KarmaChange;
use agora_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::karma::{KarmaLog, KarmaTotals};

pub struct KarmaRepo;

impl KarmaRepo {
    /// Delete log entries recorded before `cutoff`. Returns rows removed.
    pub async fn sweep(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM log_karma WHERE log_time < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// The live entry for an (executor, target) pair.
    pub async fn find(
        pool: &PgPool,
        executor: DbId,
        target: DbId,
    ) -> Result<Option<KarmaLog>, sqlx::Error> {
        sqlx::query_as::<_, KarmaLog>(
            "SELECT id_target, id_executor, action, log_time FROM log_karma \
             WHERE id_target = $1 AND id_executor = $2",
        )
        .bind(target)
        .bind(executor)
        .fetch_optional(pool)
        .await
    }

    /// Record `change` and adjust the target's counters in one transaction.
    ///
    /// Returns the target's counters afterwards.
    pub async fn apply(
        pool: &PgPool,
        executor: DbId,
        target: DbId,
        change: KarmaChange,
        now: Timestamp,
    ) -> Result<KarmaTotals, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO log_karma (id_target, id_executor, action, log_time) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id_target, id_executor) \
             DO UPDATE SET action = EXCLUDED.action, log_time = EXCLUDED.log_time",
        )
        .bind(target)
        .bind(executor)
        .bind(change.direction().as_i16())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let delta = change.delta();
        let totals = sqlx::query_as::<_, KarmaTotals>(
            "UPDATE members SET karma_good = karma_good + $2, karma_bad = karma_bad + $3 \
             WHERE id = $1 \
             RETURNING karma_good, karma_bad",
        )
        .bind(target)
        .bind(delta.good)
        .bind(delta.bad)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(totals)
    }
}
