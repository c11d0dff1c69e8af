//! Application layer for the Campus Market client.
//!
//! Use cases coordinate the backend gateways, the session store and the
//! collection caches held by an [`AppContext`].

pub mod cache;
pub mod catalog_usecase;
pub mod context;
pub mod dialog;
pub mod poller;
pub mod profile_usecase;
pub mod session_store;
pub mod trade_usecase;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CollectionCache, CollectionCaches, UNKNOWN_ITEM_TITLE};
pub use catalog_usecase::{CatalogUseCase, ItemForm};
pub use context::{AppContext, Gateways, notification_for};
pub use dialog::Dialog;
pub use poller::{MessagePoller, PollerState, ThreadSnapshot};
pub use profile_usecase::{Profile, ProfileUseCase};
pub use session_store::{SESSION_STORAGE_KEY, SessionStore};
pub use trade_usecase::{ConversationHeader, TradeUseCase};
