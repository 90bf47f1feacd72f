use super::counter_repository::{CounterRepository, CounterStoreError};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Counter store backed by Postgres. Each increment is a single upsert, so
/// atomicity comes from the database.
pub struct PostgresCounterRepository {
    pool: Arc<DbPool>,
}

impl PostgresCounterRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Create the counter tables if they are missing
    pub async fn ensure_schema(&self) -> Result<(), CounterStoreError> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_counters (
                key TEXT PRIMARY KEY,
                value BIGINT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_frequencies (
                table_name TEXT NOT NULL,
                member TEXT NOT NULL,
                value BIGINT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                PRIMARY KEY (table_name, member)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CounterRepository for PostgresCounterRepository {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn increment(&self, key: &str) -> Result<i64, CounterStoreError> {
        let pool = self.pool.as_ref();

        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO usage_counters (key, value, updated_at)
            VALUES ($1, 1, $2)
            ON CONFLICT (key)
            DO UPDATE SET
                value = usage_counters.value + 1,
                updated_at = $2
            RETURNING value
            "#,
        )
        .bind(key)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(value)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, CounterStoreError> {
        let pool = self.pool.as_ref();

        let value: Option<i64> =
            sqlx::query_scalar("SELECT value FROM usage_counters WHERE key = $1")
                .bind(key)
                .fetch_optional(pool)
                .await?;

        Ok(value)
    }

    async fn increment_member(&self, table: &str, member: &str) -> Result<(), CounterStoreError> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO usage_frequencies (table_name, member, value, updated_at)
            VALUES ($1, $2, 1, $3)
            ON CONFLICT (table_name, member)
            DO UPDATE SET
                value = usage_frequencies.value + 1,
                updated_at = $3
            "#,
        )
        .bind(table)
        .bind(member)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn top_members(
        &self,
        table: &str,
        limit: usize,
    ) -> Result<Vec<(String, i64)>, CounterStoreError> {
        let pool = self.pool.as_ref();

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT member, value
            FROM usage_frequencies
            WHERE table_name = $1
            ORDER BY value DESC, member ASC
            LIMIT $2
            "#,
        )
        .bind(table)
        .bind(limit as i64)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
