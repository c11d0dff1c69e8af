//! Shared state handed to every use case.

use crate::cache::CollectionCaches;
use crate::session_store::SessionStore;
use market_core::MarketError;
use market_core::config::ClientConfig;
use market_core::gateway::{
    AuthGateway, FavoriteGateway, ItemGateway, MessageGateway, StatsGateway, TransactionGateway,
};
use market_core::notification::{Notification, Notifier};
use market_core::storage::KeyValueStore;
use std::sync::Arc;

/// One handle per backend resource.
#[derive(Clone)]
pub struct Gateways {
    pub auth: Arc<dyn AuthGateway>,
    pub items: Arc<dyn ItemGateway>,
    pub transactions: Arc<dyn TransactionGateway>,
    pub favorites: Arc<dyn FavoriteGateway>,
    pub messages: Arc<dyn MessageGateway>,
    pub stats: Arc<dyn StatsGateway>,
}

impl Gateways {
    /// Uses one backend object for every resource.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: AuthGateway
            + ItemGateway
            + TransactionGateway
            + FavoriteGateway
            + MessageGateway
            + StatsGateway
            + 'static,
    {
        Self {
            auth: backend.clone(),
            items: backend.clone(),
            transactions: backend.clone(),
            favorites: backend.clone(),
            messages: backend.clone(),
            stats: backend,
        }
    }
}

/// Everything a use case needs, passed explicitly instead of living in globals.
pub struct AppContext {
    pub config: ClientConfig,
    pub gateways: Gateways,
    pub session: SessionStore,
    pub caches: CollectionCaches,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new(
        config: ClientConfig,
        gateways: Gateways,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let session = SessionStore::new(gateways.auth.clone(), storage);
        Self {
            config,
            gateways,
            session,
            caches: CollectionCaches::new(),
            notifier,
        }
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Shows `err` to the user as the outcome of `action`.
    pub fn report(&self, action: &str, err: &MarketError) {
        tracing::warn!("[AppContext] {} failed: {}", action, err);
        self.notify(notification_for(action, err));
    }
}

/// Maps an error to what the user sees.
///
/// Backend messages are shown verbatim; connectivity problems get a generic
/// hint; local rejections are warnings.
pub fn notification_for(action: &str, err: &MarketError) -> Notification {
    match err {
        MarketError::Api(message) | MarketError::InvalidCredentials(message) => {
            Notification::error(message.clone())
        }
        MarketError::Transport(_) => Notification::error(format!(
            "{} failed, please check your network connection",
            action
        )),
        MarketError::Validation(reason) => Notification::warning(reason.clone()),
        MarketError::Unauthenticated => Notification::warning(err.to_string()),
        other => Notification::error(format!("{} failed: {}", action, other)),
    }
}
