//! Client-trusted login state.
//!
//! The backend issues no token: the session is whatever `/user/login`
//! returned, mirrored into durable storage under [`SESSION_STORAGE_KEY`].

use market_core::gateway::AuthGateway;
use market_core::storage::KeyValueStore;
use market_core::user::{Credentials, Registration, Session};
use market_core::{MarketError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Durable key holding the serialized [`Session`].
pub const SESSION_STORAGE_KEY: &str = "currentUser";

/// Owns the at-most-one resident [`Session`].
///
/// Only `login`, `logout` and `restore` mutate it.
pub struct SessionStore {
    auth: Arc<dyn AuthGateway>,
    storage: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(auth: Arc<dyn AuthGateway>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            auth,
            storage,
            current: RwLock::new(None),
        }
    }

    /// Checks the credentials with the backend and keeps the returned identity.
    ///
    /// A rejection surfaces as `InvalidCredentials`. If the durable copy cannot
    /// be written the session still holds for this process.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(MarketError::validation("Please enter username and password"));
        }

        let session = self
            .auth
            .login(&Credentials::new(username, password))
            .await?;

        let serialized = serde_json::to_string(&session)?;
        if let Err(e) = self.storage.set(SESSION_STORAGE_KEY, &serialized).await {
            tracing::warn!("[SessionStore] Failed to persist session for {}: {}", session.username, e);
        }

        *self.current.write().await = Some(session.clone());
        tracing::info!("[SessionStore] Logged in as {}", session.username);
        Ok(session)
    }

    /// Creates an account. The caller stays logged out.
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let required = [
            &registration.username,
            &registration.password,
            &registration.email,
            &registration.phone,
            &registration.student_id,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(MarketError::validation("Please fill in all registration fields"));
        }

        self.auth.register(registration).await?;
        tracing::info!("[SessionStore] Registered {}", registration.username);
        Ok(())
    }

    /// Loads the durable session, if any.
    ///
    /// Corrupt data is removed and treated as "no session".
    pub async fn restore(&self) -> Option<Session> {
        let raw = match self.storage.get(SESSION_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to read stored session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                tracing::debug!("[SessionStore] Restored session for {}", session.username);
                *self.current.write().await = Some(session.clone());
                Some(session)
            }
            Err(e) => {
                tracing::warn!("[SessionStore] Discarding corrupt stored session: {}", e);
                if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY).await {
                    tracing::warn!("[SessionStore] Failed to remove corrupt session: {}", e);
                }
                None
            }
        }
    }

    /// Forgets the session in memory and in storage. Never fails.
    pub async fn logout(&self) {
        let previous = self.current.write().await.take();
        if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY).await {
            tracing::warn!("[SessionStore] Failed to clear stored session: {}", e);
        }
        if let Some(session) = previous {
            tracing::info!("[SessionStore] Logged out {}", session.username);
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The current session, or `Unauthenticated`.
    pub async fn require(&self) -> Result<Session> {
        self.current().await.ok_or(MarketError::Unauthenticated)
    }
}
