//! Item browsing and item management.

use crate::context::AppContext;
use market_core::config::UploadPurpose;
use market_core::item::{Item, ItemDraft, ItemFilter};
use market_core::notification::Notification;
use market_core::{MarketError, Result};
use market_infrastructure::encode_image;
use std::path::Path;
use std::sync::Arc;

/// The user-entered part of an item; the image is attached separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemForm {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: u8,
    pub condition: String,
}

impl ItemForm {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(MarketError::validation("Please enter a title"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(MarketError::validation("Please enter a valid price"));
        }
        Ok(())
    }

    fn into_draft(self, image_path: Option<String>) -> ItemDraft {
        ItemDraft {
            title: self.title.trim().to_string(),
            description: self.description,
            price: self.price,
            category: self.category,
            condition: self.condition,
            image_path,
        }
    }
}

/// Use case for listing, searching and managing items.
pub struct CatalogUseCase {
    ctx: Arc<AppContext>,
}

impl CatalogUseCase {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Loads every listed item into the items cache.
    pub async fn load_items(&self) -> Result<Vec<Item>> {
        self.filter_items(&ItemFilter::default()).await
    }

    /// Keyword search. A blank keyword lists everything.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Item>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.load_items().await;
        }

        let items = self.ctx.gateways.items.search_items(keyword).await?;
        self.ctx.caches.items.replace(items.clone()).await;
        Ok(items)
    }

    pub async fn filter_items(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        let items = self.ctx.gateways.items.list_items(filter).await?;
        tracing::debug!("[CatalogUseCase] Loaded {} items", items.len());
        self.ctx.caches.items.replace(items.clone()).await;
        Ok(items)
    }

    pub async fn item_detail(&self, item_id: i64) -> Result<Item> {
        self.ctx.gateways.items.get_item(item_id).await
    }

    /// Loads the logged-in user's items into the items cache.
    pub async fn load_my_items(&self) -> Result<Vec<Item>> {
        let session = self.ctx.session.require().await?;
        let items = self
            .ctx
            .gateways
            .items
            .list_owned_items(&session.username)
            .await?;
        self.ctx.caches.items.replace(items.clone()).await;
        Ok(items)
    }

    /// Publishes a new item, then reloads the item list.
    ///
    /// The image ceiling is checked before anything is sent.
    pub async fn publish(&self, form: ItemForm, image: Option<&Path>) -> Result<()> {
        let session = self.ctx.session.require().await?;
        form.validate()?;

        let image_path = match image {
            Some(path) => Some(encode_image(path, &self.ctx.config.upload, UploadPurpose::Create).await?),
            None => None,
        };

        let draft = form.into_draft(image_path);
        self.ctx
            .gateways
            .items
            .create_item(&session.username, &draft)
            .await?;
        tracing::info!("[CatalogUseCase] {} published '{}'", session.username, draft.title);
        self.ctx.notify(Notification::success("Item published"));

        if let Err(e) = self.load_items().await {
            tracing::warn!("[CatalogUseCase] Reload after publish failed: {}", e);
        }
        Ok(())
    }

    /// Edits a cached item. Without a new image the previous one is kept.
    pub async fn edit(&self, item_id: i64, form: ItemForm, image: Option<&Path>) -> Result<()> {
        let session = self.ctx.session.require().await?;
        let existing = self.ctx.caches.items.require(item_id).await?;
        form.validate()?;

        let image_path = match image {
            Some(path) => Some(encode_image(path, &self.ctx.config.upload, UploadPurpose::Edit).await?),
            None => existing.image_path,
        };

        let draft = form.into_draft(image_path);
        self.ctx
            .gateways
            .items
            .update_item(&session.username, item_id, &draft)
            .await?;
        self.ctx.notify(Notification::success("Item updated"));

        if let Err(e) = self.load_my_items().await {
            tracing::warn!("[CatalogUseCase] Reload after edit failed: {}", e);
        }
        Ok(())
    }

    pub async fn delete(&self, item_id: i64) -> Result<()> {
        let session = self.ctx.session.require().await?;
        self.ctx
            .gateways
            .items
            .delete_item(&session.username, item_id)
            .await?;
        self.ctx.notify(Notification::success("Item deleted"));

        if let Err(e) = self.load_my_items().await {
            tracing::warn!("[CatalogUseCase] Reload after delete failed: {}", e);
        }
        Ok(())
    }
}
