//! Durable key-value storage trait.

use async_trait::async_trait;

use crate::error::Result;

/// String-to-string storage that survives process restarts.
///
/// This is the client's only durable state; the session blob lives under a
/// single fixed key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
