use super::finish;
use crate::render;
use clap::Subcommand;
use market_application::{AppContext, CatalogUseCase, TradeUseCase};
use market_core::Result;
use std::sync::Arc;

#[derive(Subcommand)]
pub enum TradesAction {
    /// List your transactions as buyer or seller
    List,
    /// Show one transaction
    Show { id: i64 },
    /// Start buying an item
    Create { item_id: i64 },
    /// Confirm a pending transaction
    Confirm { id: i64 },
    /// Mark a confirmed transaction as completed
    Complete { id: i64 },
    /// Cancel a pending or confirmed transaction
    Cancel { id: i64 },
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List your favorite items
    List,
    /// Add an item to your favorites
    Add { item_id: i64 },
    /// Remove an item from your favorites
    Remove { item_id: i64 },
}

pub async fn run(ctx: &Arc<AppContext>, action: TradesAction) -> bool {
    let trades = TradeUseCase::new(ctx.clone());

    let (label, result): (&str, Result<()>) = match action {
        TradesAction::List => {
            let result: Result<()> = async {
                let session = ctx.session.require().await?;
                let transactions = trades.load_transactions().await?;
                render::transaction_list(&transactions, &session.username);
                Ok(())
            }
            .await;
            ("Load transactions", result)
        }
        TradesAction::Show { id } => {
            let result: Result<()> = async {
                let session = ctx.session.require().await?;
                trades.load_transactions().await?;
                let transaction = trades.transaction_detail(id).await?;
                load_items_quietly(ctx).await;
                let title = ctx.caches.item_title(transaction.item_id).await;
                render::transaction_detail(&transaction, &title, &session.username);
                Ok(())
            }
            .await;
            ("Load transaction", result)
        }
        TradesAction::Create { item_id } => {
            load_items_quietly(ctx).await;
            ("Create transaction", trades.create_transaction(item_id).await)
        }
        TradesAction::Confirm { id } => {
            let result = async {
                trades.load_transactions().await?;
                trades.confirm(id).await
            }
            .await;
            ("Update transaction", result)
        }
        TradesAction::Complete { id } => {
            let result = async {
                trades.load_transactions().await?;
                trades.complete(id).await
            }
            .await;
            ("Update transaction", result)
        }
        TradesAction::Cancel { id } => {
            let result = async {
                trades.load_transactions().await?;
                trades.cancel(id).await
            }
            .await;
            ("Update transaction", result)
        }
    };

    finish(ctx, label, result)
}

pub async fn run_favorites(ctx: &Arc<AppContext>, action: FavoritesAction) -> bool {
    let trades = TradeUseCase::new(ctx.clone());

    let (label, result) = match action {
        FavoritesAction::List => {
            let result = trades
                .load_favorites()
                .await
                .map(|items| render::item_list(&items));
            ("Load favorites", result)
        }
        FavoritesAction::Add { item_id } => ("Add favorite", trades.add_favorite(item_id).await),
        FavoritesAction::Remove { item_id } => {
            ("Remove favorite", trades.remove_favorite(item_id).await)
        }
    };

    finish(ctx, label, result)
}

/// Fills the items cache for titles and ownership checks. Failure only
/// degrades what is shown.
pub(crate) async fn load_items_quietly(ctx: &Arc<AppContext>) {
    if let Err(e) = CatalogUseCase::new(ctx.clone()).load_items().await {
        tracing::warn!("[Trades] Failed to load items: {}", e);
    }
}
