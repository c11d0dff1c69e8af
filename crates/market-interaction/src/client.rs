//! HTTP client for the Campus Market API.

use crate::envelope::decode_envelope;
use async_trait::async_trait;
use market_core::config::{ClientConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use market_core::gateway::{
    AuthGateway, FavoriteGateway, ItemGateway, MessageGateway, StatsGateway, TransactionGateway,
};
use market_core::item::{Item, ItemDraft, ItemFilter};
use market_core::message::{Message, NewMessage};
use market_core::stats::CountTarget;
use market_core::transaction::{NewTransaction, StatusUpdate, Transaction, TransactionStatus};
use market_core::user::{Credentials, Registration, Session};
use market_core::{MarketError, Result};
use reqwest::header::HeaderValue;
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::fmt::Display;
use std::time::Duration;

/// Header carrying the acting username. The backend trusts it as-is.
pub const IDENTITY_HEADER: &str = "Authorization";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteRequest {
    item_id: i64,
}

/// Campus Market API client.
///
/// Stateless apart from the connection pool: no caching, no dedup, no retry.
#[derive(Clone)]
pub struct MarketClient {
    base_url: String,
    http: Client,
}

impl MarketClient {
    /// Creates a client from the loaded configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_timeout(config.api_base.clone(), config.request_timeout())
    }

    /// Creates a client with a custom base URL and the default timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(
            base_url,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// `path` followed by `segment` as one percent-encoded path segment.
    fn segment_url(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| MarketError::config(format!("Invalid API base '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| MarketError::config(format!("Invalid API base '{}'", self.base_url)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str, identity: Option<&str>) -> Result<RequestBuilder> {
        self.request_to(method, self.url(path), identity)
    }

    fn request_to<U>(&self, method: Method, url: U, identity: Option<&str>) -> Result<RequestBuilder>
    where
        U: IntoUrl + Display,
    {
        tracing::debug!("[MarketClient] {} {}", method, url);

        let mut builder = self.http.request(method, url);
        if let Some(username) = identity {
            let value = HeaderValue::from_bytes(username.as_bytes()).map_err(|_| {
                MarketError::validation(format!("Username '{}' cannot be sent as identity", username))
            })?;
            builder = builder.header(IDENTITY_HEADER, value);
        }
        Ok(builder)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("[MarketClient] Request failed: {}", e);
            MarketError::transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| MarketError::transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::debug!("[MarketClient] HTTP {} ({} bytes)", status, body.len());
        }

        decode_envelope(status.as_u16(), &body)
    }

    async fn execute_unit(&self, builder: RequestBuilder) -> Result<()> {
        self.execute::<IgnoredAny>(builder).await.map(|_| ())
    }
}

#[async_trait]
impl AuthGateway for MarketClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let builder = self
            .request(Method::POST, "user/login", None)?
            .json(credentials);
        self.execute(builder).await.map_err(|err| match err {
            MarketError::Api(message) => MarketError::InvalidCredentials(message),
            other => other,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        let builder = self
            .request(Method::POST, "user/register", None)?
            .json(registration);
        self.execute_unit(builder).await
    }
}

#[async_trait]
impl ItemGateway for MarketClient {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        let pairs = filter.query_pairs(chrono::Local::now());
        let mut builder = self.request(Method::GET, "item", None)?;
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }
        self.execute(builder).await
    }

    async fn search_items(&self, keyword: &str) -> Result<Vec<Item>> {
        let builder = self
            .request(Method::GET, "item/search", None)?
            .query(&[("keyword", keyword)]);
        self.execute(builder).await
    }

    async fn get_item(&self, item_id: i64) -> Result<Item> {
        let builder = self.request(Method::GET, &format!("item/{item_id}"), None)?;
        self.execute(builder).await
    }

    async fn list_owned_items(&self, username: &str) -> Result<Vec<Item>> {
        let url = self.segment_url("item/owner", username)?;
        let builder = self.request_to(Method::GET, url, Some(username))?;
        self.execute(builder).await
    }

    async fn create_item(&self, username: &str, draft: &ItemDraft) -> Result<()> {
        let builder = self.request(Method::POST, "item", Some(username))?.json(draft);
        self.execute_unit(builder).await
    }

    async fn update_item(&self, username: &str, item_id: i64, draft: &ItemDraft) -> Result<()> {
        let builder = self
            .request(Method::PUT, &format!("item/{item_id}"), Some(username))?
            .json(draft);
        self.execute_unit(builder).await
    }

    async fn delete_item(&self, username: &str, item_id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("item/{item_id}"), Some(username))?;
        self.execute_unit(builder).await
    }
}

#[async_trait]
impl TransactionGateway for MarketClient {
    async fn list_transactions(&self, username: &str) -> Result<Vec<Transaction>> {
        let builder = self.request(Method::GET, "transaction", Some(username))?;
        self.execute(builder).await
    }

    async fn create_transaction(&self, username: &str, item_id: i64) -> Result<()> {
        let builder = self
            .request(Method::POST, "transaction", Some(username))?
            .json(&NewTransaction { item_id });
        self.execute_unit(builder).await
    }

    async fn update_transaction_status(
        &self,
        username: &str,
        transaction_id: i64,
        status: TransactionStatus,
    ) -> Result<()> {
        let builder = self
            .request(
                Method::PUT,
                &format!("transaction/{transaction_id}"),
                Some(username),
            )?
            .json(&StatusUpdate { status });
        self.execute_unit(builder).await
    }
}

#[async_trait]
impl FavoriteGateway for MarketClient {
    async fn list_favorites(&self, username: &str) -> Result<Vec<Item>> {
        let builder = self.request(Method::GET, "favorite", Some(username))?;
        self.execute(builder).await
    }

    async fn add_favorite(&self, username: &str, item_id: i64) -> Result<()> {
        let builder = self
            .request(Method::POST, "favorite", Some(username))?
            .json(&FavoriteRequest { item_id });
        self.execute_unit(builder).await
    }

    async fn remove_favorite(&self, username: &str, item_id: i64) -> Result<()> {
        let builder = self.request(
            Method::DELETE,
            &format!("favorite/{item_id}"),
            Some(username),
        )?;
        self.execute_unit(builder).await
    }
}

#[async_trait]
impl MessageGateway for MarketClient {
    async fn list_messages(&self, username: &str, transaction_id: i64) -> Result<Vec<Message>> {
        let builder = self.request(
            Method::GET,
            &format!("message/transaction/{transaction_id}"),
            Some(username),
        )?;
        self.execute(builder).await
    }

    async fn send_message(&self, username: &str, message: &NewMessage) -> Result<()> {
        let builder = self
            .request(Method::POST, "message", Some(username))?
            .json(message);
        self.execute_unit(builder).await
    }
}

#[async_trait]
impl StatsGateway for MarketClient {
    async fn count(&self, target: CountTarget) -> Result<u64> {
        let builder = self.request(Method::GET, target.path(), None)?;
        self.execute(builder).await
    }
}
