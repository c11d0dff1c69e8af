//! Backend gateway traits.
//!
//! Each trait covers one resource of the REST backend. `market-interaction`
//! implements all of them on a single HTTP client; the application layer only
//! sees these traits so it can be exercised against in-memory doubles.
//!
//! Methods taking a `username` send it as the identity header. The backend
//! treats that value as the authenticated principal.

use async_trait::async_trait;

use crate::error::Result;
use crate::item::{Item, ItemDraft, ItemFilter};
use crate::message::{Message, NewMessage};
use crate::stats::CountTarget;
use crate::transaction::{Transaction, TransactionStatus};
use crate::user::{Credentials, Registration, Session};

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    async fn register(&self, registration: &Registration) -> Result<()>;
}

#[async_trait]
pub trait ItemGateway: Send + Sync {
    /// Lists items; an empty filter lists everything.
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>>;

    async fn search_items(&self, keyword: &str) -> Result<Vec<Item>>;

    async fn get_item(&self, item_id: i64) -> Result<Item>;

    async fn list_owned_items(&self, username: &str) -> Result<Vec<Item>>;

    async fn create_item(&self, username: &str, draft: &ItemDraft) -> Result<()>;

    async fn update_item(&self, username: &str, item_id: i64, draft: &ItemDraft) -> Result<()>;

    async fn delete_item(&self, username: &str, item_id: i64) -> Result<()>;
}

#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Transactions where the user is buyer or seller.
    async fn list_transactions(&self, username: &str) -> Result<Vec<Transaction>>;

    async fn create_transaction(&self, username: &str, item_id: i64) -> Result<()>;

    async fn update_transaction_status(
        &self,
        username: &str,
        transaction_id: i64,
        status: TransactionStatus,
    ) -> Result<()>;
}

#[async_trait]
pub trait FavoriteGateway: Send + Sync {
    /// The favorited items themselves.
    async fn list_favorites(&self, username: &str) -> Result<Vec<Item>>;

    async fn add_favorite(&self, username: &str, item_id: i64) -> Result<()>;

    async fn remove_favorite(&self, username: &str, item_id: i64) -> Result<()>;
}

#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Full thread of a transaction, in the order the backend keeps it.
    async fn list_messages(&self, username: &str, transaction_id: i64) -> Result<Vec<Message>>;

    async fn send_message(&self, username: &str, message: &NewMessage) -> Result<()>;
}

#[async_trait]
pub trait StatsGateway: Send + Sync {
    async fn count(&self, target: CountTarget) -> Result<u64>;
}
