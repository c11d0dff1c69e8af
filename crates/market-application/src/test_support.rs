//! In-memory doubles for the gateway traits and the notifier.

use crate::context::{AppContext, Gateways};
use async_trait::async_trait;
use market_core::config::ClientConfig;
use market_core::gateway::{
    AuthGateway, FavoriteGateway, ItemGateway, MessageGateway, StatsGateway, TransactionGateway,
};
use market_core::item::{Item, ItemDraft, ItemFilter, ItemStatus};
use market_core::message::{Message, NewMessage};
use market_core::notification::{Notification, Notifier};
use market_core::stats::CountTarget;
use market_core::transaction::{Transaction, TransactionStatus};
use market_core::user::{Credentials, Registration, Session};
use market_core::{MarketError, Result};
use market_infrastructure::MemoryKeyValueStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn sample_session(username: &str) -> Session {
    Session {
        username: username.to_string(),
        email: format!("{}@campus.edu", username),
        phone: "13800000000".to_string(),
        student_id: "2021001".to_string(),
        credit_score: 100,
    }
}

pub fn sample_item(id: i64, owner: &str) -> Item {
    Item {
        id,
        title: format!("Item {}", id),
        description: String::new(),
        price: 10.0,
        category: 1,
        category_name: None,
        status: ItemStatus::Available,
        status_name: None,
        condition: "Good".to_string(),
        image_path: None,
        owner_username: owner.to_string(),
        publish_time: None,
    }
}

pub fn sample_transaction(
    id: i64,
    item_id: i64,
    seller: &str,
    buyer: &str,
    status: TransactionStatus,
) -> Transaction {
    Transaction {
        id,
        item_id,
        seller_username: seller.to_string(),
        buyer_username: buyer.to_string(),
        price: 10.0,
        status,
        status_name: status.label().to_string(),
        create_time: 1_717_000_000,
        complete_time: 0,
    }
}

pub fn sample_message(transaction_id: i64, sender: &str, content: &str) -> Message {
    Message {
        id: None,
        transaction_id,
        sender_username: sender.to_string(),
        receiver_username: None,
        content: content.to_string(),
        send_time: 1_717_000_000,
        is_read: false,
    }
}

#[derive(Default)]
struct MockState {
    offline: bool,
    login_result: Option<Result<Session>>,
    items: Vec<Item>,
    owned: HashMap<String, Vec<Item>>,
    transactions: Vec<Transaction>,
    favorites: Vec<Item>,
    threads: HashMap<i64, Vec<Message>>,
    counts: HashMap<&'static str, Result<u64>>,
    rejections: HashMap<&'static str, String>,
    calls: Vec<String>,
    message_fetches: HashMap<i64, usize>,
    sent: Vec<NewMessage>,
    drafts: Vec<ItemDraft>,
    status_updates: Vec<(i64, TransactionStatus)>,
}

/// A scripted backend that records every mutating call.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        self.with_state(|s| {
            if s.offline {
                return Err(MarketError::transport("connection refused"));
            }
            match s.rejections.get(operation) {
                Some(message) => Err(MarketError::api(message.clone())),
                None => Ok(()),
            }
        })
    }

    fn record(&self, call: String) {
        self.with_state(|s| s.calls.push(call));
    }

    pub fn set_offline(&self, offline: bool) {
        self.with_state(|s| s.offline = offline);
    }

    pub fn reject(&self, operation: &'static str, message: &str) {
        self.with_state(|s| {
            s.rejections.insert(operation, message.to_string());
        });
    }

    pub fn set_login_result(&self, result: Result<Session>) {
        self.with_state(|s| s.login_result = Some(result));
    }

    pub fn set_items(&self, items: Vec<Item>) {
        self.with_state(|s| s.items = items);
    }

    pub fn set_owned(&self, username: &str, items: Vec<Item>) {
        self.with_state(|s| {
            s.owned.insert(username.to_string(), items);
        });
    }

    pub fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.with_state(|s| s.transactions = transactions);
    }

    pub fn set_favorites(&self, favorites: Vec<Item>) {
        self.with_state(|s| s.favorites = favorites);
    }

    pub fn set_thread(&self, transaction_id: i64, messages: Vec<Message>) {
        self.with_state(|s| {
            s.threads.insert(transaction_id, messages);
        });
    }

    pub fn set_count(&self, target: CountTarget, result: Result<u64>) {
        self.with_state(|s| {
            s.counts.insert(target.path(), result);
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn message_fetches(&self, transaction_id: i64) -> usize {
        self.with_state(|s| s.message_fetches.get(&transaction_id).copied().unwrap_or(0))
    }

    pub fn sent_messages(&self) -> Vec<NewMessage> {
        self.with_state(|s| s.sent.clone())
    }

    pub fn drafts(&self) -> Vec<ItemDraft> {
        self.with_state(|s| s.drafts.clone())
    }

    pub fn status_updates(&self) -> Vec<(i64, TransactionStatus)> {
        self.with_state(|s| s.status_updates.clone())
    }
}

#[async_trait]
impl AuthGateway for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.check("login")?;
        self.record(format!("login {}", credentials.username));
        self.with_state(|s| s.login_result.clone())
            .unwrap_or_else(|| Ok(sample_session(&credentials.username)))
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        self.check("register")?;
        self.record(format!("register {}", registration.username));
        Ok(())
    }
}

#[async_trait]
impl ItemGateway for MockBackend {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        self.check("list_items")?;
        self.with_state(|s| {
            Ok(s.items
                .iter()
                .filter(|item| filter.category.is_none_or(|c| item.category == c))
                .filter(|item| filter.status.is_none_or(|st| item.status == st))
                .cloned()
                .collect())
        })
    }

    async fn search_items(&self, keyword: &str) -> Result<Vec<Item>> {
        self.check("search_items")?;
        self.record(format!("search {}", keyword));
        self.with_state(|s| {
            Ok(s.items
                .iter()
                .filter(|item| item.title.contains(keyword))
                .cloned()
                .collect())
        })
    }

    async fn get_item(&self, item_id: i64) -> Result<Item> {
        self.check("get_item")?;
        self.with_state(|s| {
            s.items
                .iter()
                .find(|item| item.id == item_id)
                .cloned()
                .ok_or_else(|| MarketError::api("Item does not exist"))
        })
    }

    async fn list_owned_items(&self, username: &str) -> Result<Vec<Item>> {
        self.check("list_owned_items")?;
        self.with_state(|s| Ok(s.owned.get(username).cloned().unwrap_or_default()))
    }

    async fn create_item(&self, username: &str, draft: &ItemDraft) -> Result<()> {
        self.check("create_item")?;
        self.record(format!("create_item {}", username));
        self.with_state(|s| s.drafts.push(draft.clone()));
        Ok(())
    }

    async fn update_item(&self, username: &str, item_id: i64, draft: &ItemDraft) -> Result<()> {
        self.check("update_item")?;
        self.record(format!("update_item {} {}", username, item_id));
        self.with_state(|s| s.drafts.push(draft.clone()));
        Ok(())
    }

    async fn delete_item(&self, username: &str, item_id: i64) -> Result<()> {
        self.check("delete_item")?;
        self.record(format!("delete_item {} {}", username, item_id));
        Ok(())
    }
}

#[async_trait]
impl TransactionGateway for MockBackend {
    async fn list_transactions(&self, username: &str) -> Result<Vec<Transaction>> {
        self.check("list_transactions")?;
        self.with_state(|s| {
            Ok(s.transactions
                .iter()
                .filter(|t| t.buyer_username == username || t.seller_username == username)
                .cloned()
                .collect())
        })
    }

    async fn create_transaction(&self, username: &str, item_id: i64) -> Result<()> {
        self.check("create_transaction")?;
        self.record(format!("create_transaction {} {}", username, item_id));
        Ok(())
    }

    async fn update_transaction_status(
        &self,
        username: &str,
        transaction_id: i64,
        status: TransactionStatus,
    ) -> Result<()> {
        self.check("update_transaction_status")?;
        self.record(format!("update_transaction_status {} {}", username, transaction_id));
        self.with_state(|s| {
            s.status_updates.push((transaction_id, status));
            if let Some(t) = s.transactions.iter_mut().find(|t| t.id == transaction_id) {
                t.status = status;
            }
        });
        Ok(())
    }
}

#[async_trait]
impl FavoriteGateway for MockBackend {
    async fn list_favorites(&self, _username: &str) -> Result<Vec<Item>> {
        self.check("list_favorites")?;
        self.with_state(|s| Ok(s.favorites.clone()))
    }

    async fn add_favorite(&self, username: &str, item_id: i64) -> Result<()> {
        self.check("add_favorite")?;
        self.record(format!("add_favorite {} {}", username, item_id));
        Ok(())
    }

    async fn remove_favorite(&self, username: &str, item_id: i64) -> Result<()> {
        self.check("remove_favorite")?;
        self.record(format!("remove_favorite {} {}", username, item_id));
        self.with_state(|s| s.favorites.retain(|item| item.id != item_id));
        Ok(())
    }
}

#[async_trait]
impl MessageGateway for MockBackend {
    async fn list_messages(&self, _username: &str, transaction_id: i64) -> Result<Vec<Message>> {
        self.with_state(|s| *s.message_fetches.entry(transaction_id).or_insert(0) += 1);
        self.check("list_messages")?;
        self.with_state(|s| Ok(s.threads.get(&transaction_id).cloned().unwrap_or_default()))
    }

    async fn send_message(&self, username: &str, message: &NewMessage) -> Result<()> {
        self.check("send_message")?;
        self.with_state(|s| {
            s.sent.push(message.clone());
            s.threads
                .entry(message.transaction_id)
                .or_default()
                .push(sample_message(message.transaction_id, username, &message.content));
        });
        Ok(())
    }
}

#[async_trait]
impl StatsGateway for MockBackend {
    async fn count(&self, target: CountTarget) -> Result<u64> {
        self.check("count")?;
        self.with_state(|s| s.counts.get(target.path()).cloned().unwrap_or(Ok(0)))
    }
}

/// Notifier that keeps everything it is given.
#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Returns and clears the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notes.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notes.lock().unwrap().push(notification);
    }
}

/// A context wired to a fresh [`MockBackend`] and in-memory storage.
pub fn test_context() -> (Arc<AppContext>, Arc<MockBackend>, Arc<RecordingNotifier>) {
    let backend = Arc::new(MockBackend::new());
    let notes = Arc::new(RecordingNotifier::default());
    let ctx = AppContext::new(
        ClientConfig::default(),
        Gateways::from_backend(backend.clone()),
        Arc::new(MemoryKeyValueStore::new()),
        notes.clone(),
    );
    (Arc::new(ctx), backend, notes)
}

/// Like [`test_context`] but already logged in as `username`.
pub async fn logged_in_context(
    username: &str,
) -> (Arc<AppContext>, Arc<MockBackend>, Arc<RecordingNotifier>) {
    let (ctx, backend, notes) = test_context();
    ctx.session.login(username, "secret").await.unwrap();
    backend.with_state(|s| s.calls.clear());
    (ctx, backend, notes)
}
