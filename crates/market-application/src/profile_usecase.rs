//! Profile page and site-wide counters.

use crate::context::AppContext;
use crate::trade_usecase::TradeUseCase;
use market_core::Result;
use market_core::stats::{CountTarget, ProfileStats, SystemStats};
use market_core::transaction::TransactionStatus;
use market_core::user::Session;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub session: Session,
    pub stats: ProfileStats,
}

pub struct ProfileUseCase {
    ctx: Arc<AppContext>,
}

impl ProfileUseCase {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Identity plus counters, after refreshing transactions and favorites.
    ///
    /// A failed refresh is logged and the counters use whatever is cached.
    pub async fn profile(&self) -> Result<Profile> {
        let session = self.ctx.session.require().await?;

        let trades = TradeUseCase::new(self.ctx.clone());
        if let Err(e) = trades.load_transactions().await {
            tracing::warn!("[ProfileUseCase] Failed to refresh transactions: {}", e);
        }
        if let Err(e) = trades.load_favorites().await {
            tracing::warn!("[ProfileUseCase] Failed to refresh favorites: {}", e);
        }

        let caches = &self.ctx.caches;
        let my_items = caches
            .items
            .snapshot()
            .await
            .iter()
            .filter(|item| item.is_owned_by(&session.username))
            .count();
        let completed_transactions = caches
            .transactions
            .snapshot()
            .await
            .iter()
            .filter(|t| t.status == TransactionStatus::Completed)
            .count();

        let stats = ProfileStats {
            my_items,
            completed_transactions,
            favorites: caches.favorites.len().await,
            credit_score: session.credit_score,
        };
        Ok(Profile { session, stats })
    }

    /// Site-wide counters. Never fails.
    ///
    /// An unreachable backend shows zeros; a counter the backend refuses to
    /// report stays unknown.
    pub async fn system_stats(&self) -> SystemStats {
        let mut stats = SystemStats::default();
        for target in [CountTarget::Users, CountTarget::Items, CountTarget::Transactions] {
            let value = match self.ctx.gateways.stats.count(target).await {
                Ok(count) => Some(count),
                Err(e) if e.is_transport() => {
                    tracing::warn!("[ProfileUseCase] Counting {} failed: {}", target, e);
                    Some(0)
                }
                Err(e) => {
                    tracing::warn!("[ProfileUseCase] Backend refused {} count: {}", target, e);
                    None
                }
            };
            match target {
                CountTarget::Users => stats.users = value,
                CountTarget::Items => stats.items = value,
                CountTarget::Transactions => stats.transactions = value,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{logged_in_context, sample_item, sample_transaction, test_context};
    use market_core::MarketError;

    #[tokio::test]
    async fn test_profile_counts_only_completed_transactions() {
        let (ctx, backend, _notes) = logged_in_context("alice").await;
        backend.set_transactions(vec![
            sample_transaction(1, 1, "bob", "alice", TransactionStatus::Completed),
            sample_transaction(2, 2, "bob", "alice", TransactionStatus::Confirmed),
            sample_transaction(3, 3, "alice", "carol", TransactionStatus::Completed),
        ]);
        backend.set_favorites(vec![sample_item(9, "bob")]);
        ctx.caches
            .items
            .replace(vec![sample_item(4, "alice"), sample_item(5, "alice"), sample_item(6, "bob")])
            .await;

        let profile = ProfileUseCase::new(ctx).profile().await.unwrap();

        assert_eq!(profile.session.username, "alice");
        assert_eq!(
            profile.stats,
            ProfileStats {
                my_items: 2,
                completed_transactions: 2,
                favorites: 1,
                credit_score: 100,
            }
        );
    }

    #[tokio::test]
    async fn test_profile_survives_refresh_failures() {
        let (ctx, backend, _notes) = logged_in_context("alice").await;
        backend.set_offline(true);

        let profile = ProfileUseCase::new(ctx).profile().await.unwrap();
        assert_eq!(profile.stats.completed_transactions, 0);
        assert_eq!(profile.stats.favorites, 0);
    }

    #[tokio::test]
    async fn test_profile_requires_login() {
        let (ctx, _backend, _notes) = test_context();
        assert_eq!(
            ProfileUseCase::new(ctx).profile().await.unwrap_err(),
            MarketError::Unauthenticated
        );
    }

    #[tokio::test]
    async fn test_system_stats_zero_when_offline() {
        let (ctx, backend, _notes) = test_context();
        backend.set_offline(true);

        let stats = ProfileUseCase::new(ctx).system_stats().await;
        assert_eq!(stats, SystemStats::zeroed());
    }

    #[tokio::test]
    async fn test_system_stats_refused_counter_is_unknown() {
        let (ctx, backend, _notes) = test_context();
        backend.set_count(CountTarget::Users, Ok(42));
        backend.set_count(CountTarget::Items, Err(MarketError::api("Not allowed")));
        backend.set_count(CountTarget::Transactions, Ok(7));

        let stats = ProfileUseCase::new(ctx).system_stats().await;
        assert_eq!(
            stats,
            SystemStats {
                users: Some(42),
                items: None,
                transactions: Some(7),
            }
        );
    }
}
