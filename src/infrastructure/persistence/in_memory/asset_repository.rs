//! # In-Memory Asset Repository
//!
//! In-memory implementation of [`AssetRepository`] for testing.
//!
//! This implementation uses a thread-safe `HashMap` for storage and
//! enforces the same optimistic version discipline as the durable
//! backends, so concurrency tests exercise real conflict behavior.

use crate::domain::entities::asset::Asset;
use crate::domain::value_objects::{AssetId, AssetStatus, IdempotencyKey, WalletAddress};
use crate::infrastructure::persistence::traits::{
    AssetRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`AssetRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetRepository {
    storage: Arc<RwLock<HashMap<AssetId, Asset>>>,
}

impl InMemoryAssetRepository {
    /// Creates a new empty in-memory asset repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all assets from the repository.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }
}

#[async_trait]
impl AssetRepository for InMemoryAssetRepository {
    async fn save(&self, asset: &Asset) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        match storage.get(&asset.id()) {
            None => {
                storage.insert(asset.id(), asset.clone());
                Ok(())
            }
            Some(stored) if stored.version() + 1 == asset.version() => {
                storage.insert(asset.id(), asset.clone());
                Ok(())
            }
            Some(stored) => Err(RepositoryError::version_conflict(
                "Asset",
                asset.id().to_string(),
                stored.version() + 1,
                asset.version(),
            )),
        }
    }

    async fn get(&self, id: AssetId) -> RepositoryResult<Option<Asset>> {
        Ok(self.storage.read().await.get(&id).cloned())
    }

    async fn find_by_status(&self, status: AssetStatus) -> RepositoryResult<Vec<Asset>> {
        Ok(self
            .storage
            .read()
            .await
            .values()
            .filter(|a| a.status() == status)
            .cloned()
            .collect())
    }

    async fn find_by_owner(&self, owner: &WalletAddress) -> RepositoryResult<Vec<Asset>> {
        Ok(self
            .storage
            .read()
            .await
            .values()
            .filter(|a| a.owner() == owner)
            .cloned()
            .collect())
    }

    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> RepositoryResult<Option<Asset>> {
        Ok(self
            .storage
            .read()
            .await
            .values()
            .find(|a| a.idempotency_key() == Some(key))
            .cloned())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.storage.read().await.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::asset::AssetDraft;
    use crate::domain::value_objects::{FiatAmount, Timestamp};

    fn owner() -> WalletAddress {
        WalletAddress::parse("0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0").unwrap()
    }

    fn asset(id: u64, key: Option<IdempotencyKey>) -> Asset {
        let draft = AssetDraft {
            company_name: "AIA".into(),
            product_name: "Protect Plus".into(),
            category: "life".into(),
            contract_date: Timestamp::from_secs(1_600_000_000).unwrap(),
            contract_period_months: 240,
            paid_period_months: 60,
            annual_premium: FiatAmount::from_major(2_000),
            total_paid: FiatAmount::from_major(10_000),
            supplemental: None,
        };
        Asset::register(
            AssetId::new(id),
            owner(),
            draft,
            key,
            Timestamp::from_secs(1_700_000_000).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_and_get() {
        let repo = InMemoryAssetRepository::new();
        let asset = asset(1, None);
        repo.save(&asset).await.unwrap();

        let loaded = repo.get(AssetId::new(1)).await.unwrap().unwrap();
        assert_eq!(loaded, asset);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let repo = InMemoryAssetRepository::new();
        assert!(repo.get(AssetId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_save_conflicts() {
        let repo = InMemoryAssetRepository::new();
        let stored = asset(1, None);
        repo.save(&stored).await.unwrap();

        // Two copies loaded at the same version; both mutate.
        let mut first = repo.get(AssetId::new(1)).await.unwrap().unwrap();
        let mut second = repo.get(AssetId::new(1)).await.unwrap().unwrap();
        first.cancel().unwrap();
        second.cancel().unwrap();

        repo.save(&first).await.unwrap();
        let result = repo.save(&second).await;
        assert!(matches!(
            result,
            Err(RepositoryError::VersionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn unmodified_resave_conflicts() {
        let repo = InMemoryAssetRepository::new();
        let stored = asset(1, None);
        repo.save(&stored).await.unwrap();

        // Saving the same version again is a conflict, not a no-op.
        let result = repo.save(&stored).await;
        assert!(matches!(
            result,
            Err(RepositoryError::VersionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let repo = InMemoryAssetRepository::new();
        repo.save(&asset(1, None)).await.unwrap();
        let mut cancelled = asset(2, None);
        cancelled.cancel().unwrap();
        repo.save(&cancelled).await.unwrap();

        let registered = repo.find_by_status(AssetStatus::Registered).await.unwrap();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].id(), AssetId::new(1));
    }

    #[tokio::test]
    async fn find_by_idempotency_key() {
        let repo = InMemoryAssetRepository::new();
        let key = IdempotencyKey::new("reg-001");
        repo.save(&asset(1, Some(key.clone()))).await.unwrap();
        repo.save(&asset(2, None)).await.unwrap();

        let found = repo.find_by_idempotency_key(&key).await.unwrap();
        assert_eq!(found.unwrap().id(), AssetId::new(1));

        let missing = repo
            .find_by_idempotency_key(&IdempotencyKey::new("reg-999"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn find_by_owner_filters() {
        let repo = InMemoryAssetRepository::new();
        repo.save(&asset(1, None)).await.unwrap();

        let mine = repo.find_by_owner(&owner()).await.unwrap();
        assert_eq!(mine.len(), 1);

        let other =
            WalletAddress::parse("0x2222222222222222222222222222222222222222").unwrap();
        assert!(repo.find_by_owner(&other).await.unwrap().is_empty());
    }
}
