//! # In-Memory Trade Repository
//!
//! In-memory implementation of [`TradeRepository`] for testing.

use crate::domain::entities::trade::Trade;
use crate::domain::value_objects::{AssetId, TradeId, TradeStatus};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, TradeRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`TradeRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTradeRepository {
    storage: Arc<RwLock<HashMap<TradeId, Trade>>>,
}

impl InMemoryTradeRepository {
    /// Creates a new empty in-memory trade repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all trades from the repository.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn save(&self, trade: &Trade) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        match storage.get(&trade.id()) {
            None => {
                storage.insert(trade.id(), trade.clone());
                Ok(())
            }
            Some(stored) if stored.version() + 1 == trade.version() => {
                storage.insert(trade.id(), trade.clone());
                Ok(())
            }
            Some(stored) => Err(RepositoryError::version_conflict(
                "Trade",
                trade.id().to_string(),
                stored.version() + 1,
                trade.version(),
            )),
        }
    }

    async fn get(&self, id: TradeId) -> RepositoryResult<Option<Trade>> {
        Ok(self.storage.read().await.get(&id).cloned())
    }

    async fn find_open_by_asset(&self, asset_id: AssetId) -> RepositoryResult<Option<Trade>> {
        Ok(self
            .storage
            .read()
            .await
            .values()
            .find(|t| t.asset_id() == asset_id && !t.status().is_terminal())
            .cloned())
    }

    async fn find_by_asset(&self, asset_id: AssetId) -> RepositoryResult<Vec<Trade>> {
        Ok(self
            .storage
            .read()
            .await
            .values()
            .filter(|t| t.asset_id() == asset_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: TradeStatus) -> RepositoryResult<Vec<Trade>> {
        Ok(self
            .storage
            .read()
            .await
            .values()
            .filter(|t| t.status() == status)
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.storage.read().await.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FiatAmount, Timestamp, WalletAddress};

    fn trade(id: u64, asset: u64) -> Trade {
        Trade::create(
            TradeId::new(id),
            AssetId::new(asset),
            WalletAddress::parse("0x1111111111111111111111111111111111111111").unwrap(),
            WalletAddress::parse("0x2222222222222222222222222222222222222222").unwrap(),
            FiatAmount::from_major(15_000),
            Timestamp::from_secs(1_700_000_000).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_and_get() {
        let repo = InMemoryTradeRepository::new();
        let trade = trade(1, 1);
        repo.save(&trade).await.unwrap();
        assert_eq!(repo.get(TradeId::new(1)).await.unwrap().unwrap(), trade);
    }

    #[tokio::test]
    async fn open_trade_lookup_skips_terminal() {
        let repo = InMemoryTradeRepository::new();
        let mut cancelled = trade(1, 7);
        cancelled.cancel().unwrap();
        repo.save(&cancelled).await.unwrap();

        assert!(repo
            .find_open_by_asset(AssetId::new(7))
            .await
            .unwrap()
            .is_none());

        repo.save(&trade(2, 7)).await.unwrap();
        let open = repo.find_open_by_asset(AssetId::new(7)).await.unwrap();
        assert_eq!(open.unwrap().id(), TradeId::new(2));
    }

    #[tokio::test]
    async fn find_by_asset_returns_all() {
        let repo = InMemoryTradeRepository::new();
        let mut cancelled = trade(1, 7);
        cancelled.cancel().unwrap();
        repo.save(&cancelled).await.unwrap();
        repo.save(&trade(2, 7)).await.unwrap();
        repo.save(&trade(3, 8)).await.unwrap();

        let all = repo.find_by_asset(AssetId::new(7)).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn stale_save_conflicts() {
        let repo = InMemoryTradeRepository::new();
        repo.save(&trade(1, 1)).await.unwrap();

        let mut first = repo.get(TradeId::new(1)).await.unwrap().unwrap();
        let mut second = repo.get(TradeId::new(1)).await.unwrap().unwrap();
        first.cancel().unwrap();
        second.cancel().unwrap();

        repo.save(&first).await.unwrap();
        assert!(matches!(
            repo.save(&second).await,
            Err(RepositoryError::VersionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let repo = InMemoryTradeRepository::new();
        repo.save(&trade(1, 1)).await.unwrap();
        let mut cancelled = trade(2, 2);
        cancelled.cancel().unwrap();
        repo.save(&cancelled).await.unwrap();

        let created = repo.find_by_status(TradeStatus::Created).await.unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id(), TradeId::new(1));
    }
}
