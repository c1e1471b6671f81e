//! # PostgreSQL Trade Repository
//!
//! PostgreSQL implementation of [`TradeRepository`] using sqlx.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE trades (
//!     id       BIGINT PRIMARY KEY,
//!     asset_id BIGINT NOT NULL,
//!     status   TEXT   NOT NULL,
//!     version  BIGINT NOT NULL,
//!     payload  TEXT   NOT NULL
//! );
//! ```

use crate::domain::entities::trade::Trade;
use crate::domain::value_objects::{AssetId, TradeId, TradeStatus};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, TradeRepository,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of [`TradeRepository`].
#[derive(Debug, Clone)]
pub struct PostgresTradeRepository {
    pool: PgPool,
}

impl PostgresTradeRepository {
    /// Creates a new PostgreSQL trade repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn encode(trade: &Trade) -> RepositoryResult<String> {
        serde_json::to_string(trade).map_err(|e| RepositoryError::serialization(e.to_string()))
    }

    fn decode(payload: &str) -> RepositoryResult<Trade> {
        serde_json::from_str(payload).map_err(|e| RepositoryError::serialization(e.to_string()))
    }

    async fn stored_version(&self, id: TradeId) -> RepositoryResult<Option<u64>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM trades WHERE id = $1")
            .bind(id.value() as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(row.map(|(v,)| v as u64))
    }
}

#[async_trait]
impl TradeRepository for PostgresTradeRepository {
    async fn save(&self, trade: &Trade) -> RepositoryResult<()> {
        let payload = Self::encode(trade)?;
        let id = trade.id().value() as i64;
        let version = trade.version() as i64;

        if trade.version() == 1 {
            let result = sqlx::query(
                r#"
                INSERT INTO trades (id, asset_id, status, version, payload)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(id)
            .bind(trade.asset_id().value() as i64)
            .bind(trade.status().to_string())
            .bind(version)
            .bind(&payload)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::duplicate("Trade", trade.id().to_string()));
            }
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            UPDATE trades
            SET status = $2, version = $3, payload = $4
            WHERE id = $1 AND version = $5
            "#,
        )
        .bind(id)
        .bind(trade.status().to_string())
        .bind(version)
        .bind(&payload)
        .bind(version - 1)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            let actual = self.stored_version(trade.id()).await?.unwrap_or(0);
            return Err(RepositoryError::version_conflict(
                "Trade",
                trade.id().to_string(),
                trade.version(),
                actual,
            ));
        }
        Ok(())
    }

    async fn get(&self, id: TradeId) -> RepositoryResult<Option<Trade>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT payload FROM trades WHERE id = $1")
            .bind(id.value() as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(|(payload,)| Self::decode(&payload)).transpose()
    }

    async fn find_open_by_asset(&self, asset_id: AssetId) -> RepositoryResult<Option<Trade>> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT payload FROM trades
            WHERE asset_id = $1 AND status NOT IN ('COMPLETED', 'CANCELLED')
            LIMIT 1
            "#,
        )
        .bind(asset_id.value() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(|(payload,)| Self::decode(&payload)).transpose()
    }

    async fn find_by_asset(&self, asset_id: AssetId) -> RepositoryResult<Vec<Trade>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT payload FROM trades WHERE asset_id = $1 ORDER BY id ASC")
                .bind(asset_id.value() as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.iter().map(|(p,)| Self::decode(p)).collect()
    }

    async fn find_by_status(&self, status: TradeStatus) -> RepositoryResult<Vec<Trade>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT payload FROM trades WHERE status = $1 ORDER BY id ASC")
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.iter().map(|(p,)| Self::decode(p)).collect()
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trades")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(count as u64)
    }
}
