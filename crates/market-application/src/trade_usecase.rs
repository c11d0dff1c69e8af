//! Transactions, favorites and the per-transaction conversation.

use crate::context::AppContext;
use crate::poller::MessagePoller;
use market_core::item::Item;
use market_core::notification::Notification;
use market_core::transaction::{Transaction, TransactionStatus};
use market_core::{MarketError, Result};
use std::sync::Arc;

/// What the conversation dialog shows above the thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHeader {
    pub transaction_id: i64,
    pub counterpart: String,
    pub item_title: String,
}

pub struct TradeUseCase {
    ctx: Arc<AppContext>,
}

impl TradeUseCase {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Loads the user's transactions (as buyer or seller) into the cache.
    pub async fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let session = self.ctx.session.require().await?;
        let transactions = self
            .ctx
            .gateways
            .transactions
            .list_transactions(&session.username)
            .await?;
        self.ctx
            .caches
            .transactions
            .replace(transactions.clone())
            .await;
        Ok(transactions)
    }

    /// A transaction from the last loaded list.
    pub async fn transaction_detail(&self, transaction_id: i64) -> Result<Transaction> {
        self.ctx.caches.transactions.require(transaction_id).await
    }

    /// Starts buying `item_id`.
    pub async fn create_transaction(&self, item_id: i64) -> Result<()> {
        let session = self.ctx.session.require().await?;
        if let Some(item) = self.ctx.caches.items.find(item_id).await {
            if item.is_owned_by(&session.username) {
                return Err(MarketError::validation("You cannot buy your own item"));
            }
        }

        self.ctx
            .gateways
            .transactions
            .create_transaction(&session.username, item_id)
            .await?;
        self.ctx.notify(Notification::success("Transaction created"));
        self.reload_transactions("create").await;
        Ok(())
    }

    pub async fn confirm(&self, transaction_id: i64) -> Result<()> {
        self.change_status(transaction_id, TransactionStatus::Confirmed)
            .await
    }

    pub async fn complete(&self, transaction_id: i64) -> Result<()> {
        self.change_status(transaction_id, TransactionStatus::Completed)
            .await
    }

    pub async fn cancel(&self, transaction_id: i64) -> Result<()> {
        self.change_status(transaction_id, TransactionStatus::Cancelled)
            .await
    }

    async fn change_status(&self, transaction_id: i64, next: TransactionStatus) -> Result<()> {
        let session = self.ctx.session.require().await?;
        let transaction = self.ctx.caches.transactions.require(transaction_id).await?;

        if !transaction.status.can_transition_to(next) {
            return Err(MarketError::validation(format!(
                "A {} transaction cannot become {}",
                transaction.status.label(),
                next.label()
            )));
        }

        self.ctx
            .gateways
            .transactions
            .update_transaction_status(&session.username, transaction_id, next)
            .await?;
        tracing::info!(
            "[TradeUseCase] Transaction {} {} -> {}",
            transaction_id,
            transaction.status,
            next
        );
        self.ctx.notify(Notification::success("Transaction status updated"));
        self.reload_transactions("status change").await;
        Ok(())
    }

    async fn reload_transactions(&self, after: &str) {
        if let Err(e) = self.load_transactions().await {
            tracing::warn!("[TradeUseCase] Reload after {} failed: {}", after, e);
        }
    }

    /// Loads the favorited items into the cache.
    pub async fn load_favorites(&self) -> Result<Vec<Item>> {
        let session = self.ctx.session.require().await?;
        let favorites = self
            .ctx
            .gateways
            .favorites
            .list_favorites(&session.username)
            .await?;
        self.ctx.caches.favorites.replace(favorites.clone()).await;
        Ok(favorites)
    }

    pub async fn add_favorite(&self, item_id: i64) -> Result<()> {
        let session = self.ctx.session.require().await?;
        self.ctx
            .gateways
            .favorites
            .add_favorite(&session.username, item_id)
            .await?;
        self.ctx.notify(Notification::success("Added to favorites"));
        Ok(())
    }

    pub async fn remove_favorite(&self, item_id: i64) -> Result<()> {
        let session = self.ctx.session.require().await?;
        self.ctx
            .gateways
            .favorites
            .remove_favorite(&session.username, item_id)
            .await?;
        self.ctx.notify(Notification::success("Removed from favorites"));

        if let Err(e) = self.load_favorites().await {
            tracing::warn!("[TradeUseCase] Reload after removing favorite failed: {}", e);
        }
        Ok(())
    }

    /// Opens the thread of a cached transaction on `poller`.
    pub async fn open_conversation(
        &self,
        poller: &MessagePoller,
        transaction_id: i64,
    ) -> Result<ConversationHeader> {
        let session = self.ctx.session.require().await?;
        let transaction = self.ctx.caches.transactions.require(transaction_id).await?;

        let header = ConversationHeader {
            transaction_id,
            counterpart: transaction.counterpart_of(&session.username).to_string(),
            item_title: self.ctx.caches.item_title(transaction.item_id).await,
        };

        poller.open(transaction_id, session.username).await;
        Ok(header)
    }
}
