//! Disposable views of backend collections.

use market_core::item::Item;
use market_core::transaction::Transaction;
use market_core::{Identified, MarketError, Result};
use tokio::sync::RwLock;

/// Title shown for an item that is not in any cache.
pub const UNKNOWN_ITEM_TITLE: &str = "Unknown item";

/// The last successfully loaded list of one resource.
///
/// Contents are replaced wholesale by each load; nothing is merged.
pub struct CollectionCache<T> {
    entity_type: &'static str,
    entries: RwLock<Vec<T>>,
}

impl<T> CollectionCache<T>
where
    T: Identified + Clone,
{
    pub fn new(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub async fn replace(&self, entries: Vec<T>) {
        *self.entries.write().await = entries;
    }

    pub async fn snapshot(&self) -> Vec<T> {
        self.entries.read().await.clone()
    }

    pub async fn find(&self, id: i64) -> Option<T> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.id() == id)
            .cloned()
    }

    /// Like [`find`](Self::find) but a miss is `NotFound`.
    pub async fn require(&self, id: i64) -> Result<T> {
        self.find(id)
            .await
            .ok_or_else(|| MarketError::not_found(self.entity_type, id))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// The per-resource caches a running client keeps.
pub struct CollectionCaches {
    pub items: CollectionCache<Item>,
    pub transactions: CollectionCache<Transaction>,
    pub favorites: CollectionCache<Item>,
}

impl CollectionCaches {
    pub fn new() -> Self {
        Self {
            items: CollectionCache::new("Item"),
            transactions: CollectionCache::new("Transaction"),
            favorites: CollectionCache::new("Favorite"),
        }
    }

    /// Title of a cached item, or [`UNKNOWN_ITEM_TITLE`].
    pub async fn item_title(&self, item_id: i64) -> String {
        if let Some(item) = self.items.find(item_id).await {
            return item.title;
        }
        if let Some(item) = self.favorites.find(item_id).await {
            return item.title;
        }
        UNKNOWN_ITEM_TITLE.to_string()
    }

    pub async fn clear_all(&self) {
        self.items.clear().await;
        self.transactions.clear().await;
        self.favorites.clear().await;
    }
}

impl Default for CollectionCaches {
    fn default() -> Self {
        Self::new()
    }
}
