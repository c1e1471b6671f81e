//! # PostgreSQL Asset Repository
//!
//! PostgreSQL implementation of [`AssetRepository`] using sqlx.
//!
//! The aggregate is stored as a serialized payload next to the indexed
//! columns used for queries (`owner`, `status`, `idempotency_key`).
//! Optimistic locking rides on a guarded `UPDATE ... WHERE version =`.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE insurance_assets (
//!     id              BIGINT PRIMARY KEY,
//!     owner           TEXT   NOT NULL,
//!     status          TEXT   NOT NULL,
//!     version         BIGINT NOT NULL,
//!     idempotency_key TEXT,
//!     payload         TEXT   NOT NULL
//! );
//! ```

use crate::domain::entities::asset::Asset;
use crate::domain::value_objects::{AssetId, AssetStatus, IdempotencyKey, WalletAddress};
use crate::infrastructure::persistence::traits::{
    AssetRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of [`AssetRepository`].
///
/// Uses connection pooling via `sqlx::PgPool`.
///
/// # Examples
///
/// ```ignore
/// use sqlx::PgPool;
/// use wellswap_settlement::infrastructure::persistence::postgres::PostgresAssetRepository;
///
/// let pool = PgPool::connect("postgres://...").await?;
/// let repo = PostgresAssetRepository::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresAssetRepository {
    pool: PgPool,
}

impl PostgresAssetRepository {
    /// Creates a new PostgreSQL asset repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn encode(asset: &Asset) -> RepositoryResult<String> {
        serde_json::to_string(asset).map_err(|e| RepositoryError::serialization(e.to_string()))
    }

    fn decode(payload: &str) -> RepositoryResult<Asset> {
        serde_json::from_str(payload).map_err(|e| RepositoryError::serialization(e.to_string()))
    }

    async fn stored_version(&self, id: AssetId) -> RepositoryResult<Option<u64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT version FROM insurance_assets WHERE id = $1")
                .bind(id.value() as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(row.map(|(v,)| v as u64))
    }
}

#[async_trait]
impl AssetRepository for PostgresAssetRepository {
    async fn save(&self, asset: &Asset) -> RepositoryResult<()> {
        let payload = Self::encode(asset)?;
        let id = asset.id().value() as i64;
        let version = asset.version() as i64;

        if asset.version() == 1 {
            let result = sqlx::query(
                r#"
                INSERT INTO insurance_assets (id, owner, status, version, idempotency_key, payload)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(id)
            .bind(asset.owner().as_str())
            .bind(asset.status().to_string())
            .bind(version)
            .bind(asset.idempotency_key().map(IdempotencyKey::as_str))
            .bind(&payload)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::duplicate("Asset", asset.id().to_string()));
            }
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            UPDATE insurance_assets
            SET owner = $2, status = $3, version = $4, payload = $5
            WHERE id = $1 AND version = $6
            "#,
        )
        .bind(id)
        .bind(asset.owner().as_str())
        .bind(asset.status().to_string())
        .bind(version)
        .bind(&payload)
        .bind(version - 1)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            let actual = self.stored_version(asset.id()).await?.unwrap_or(0);
            return Err(RepositoryError::version_conflict(
                "Asset",
                asset.id().to_string(),
                asset.version(),
                actual,
            ));
        }
        Ok(())
    }

    async fn get(&self, id: AssetId) -> RepositoryResult<Option<Asset>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM insurance_assets WHERE id = $1")
                .bind(id.value() as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(|(payload,)| Self::decode(&payload)).transpose()
    }

    async fn find_by_status(&self, status: AssetStatus) -> RepositoryResult<Vec<Asset>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT payload FROM insurance_assets WHERE status = $1 ORDER BY id ASC",
        )
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.iter().map(|(p,)| Self::decode(p)).collect()
    }

    async fn find_by_owner(&self, owner: &WalletAddress) -> RepositoryResult<Vec<Asset>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT payload FROM insurance_assets WHERE owner = $1 ORDER BY id ASC",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.iter().map(|(p,)| Self::decode(p)).collect()
    }

    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> RepositoryResult<Option<Asset>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM insurance_assets WHERE idempotency_key = $1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(|(payload,)| Self::decode(&payload)).transpose()
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM insurance_assets")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(count as u64)
    }
}
