use super::finish;
use crate::render;
use clap::Subcommand;
use market_application::{AppContext, CatalogUseCase, ItemForm};
use market_core::item::{ItemFilter, ItemStatus, ListedWithin};
use market_core::{MarketError, Result};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand)]
pub enum ItemsAction {
    /// List items, optionally filtered
    List {
        /// Category code (1-5)
        #[arg(long)]
        category: Option<u8>,
        /// Status code (0 available, 1 reserved, 2 sold)
        #[arg(long)]
        status: Option<u8>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// today, week, month or 3months
        #[arg(long)]
        within: Option<ListedWithin>,
    },
    /// Search items by keyword
    Search { keyword: Option<String> },
    /// Show one item
    Show { id: i64 },
    /// List your own items
    Mine,
    /// Publish a new item
    Publish {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 1)]
        category: u8,
        #[arg(long, default_value = "")]
        condition: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit one of your items; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<u8>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete one of your items
    Delete { id: i64 },
}

pub async fn run(ctx: &Arc<AppContext>, action: ItemsAction) -> bool {
    let catalog = CatalogUseCase::new(ctx.clone());

    let (label, result) = match action {
        ItemsAction::List {
            category,
            status,
            min_price,
            max_price,
            within,
        } => {
            let result: Result<()> = async {
                let filter = ItemFilter {
                    category,
                    status: status.map(parse_status).transpose()?,
                    min_price,
                    max_price,
                    listed_within: within,
                };
                let items = catalog.filter_items(&filter).await?;
                render::item_list(&items);
                Ok(())
            }
            .await;
            ("Load items", result)
        }
        ItemsAction::Search { keyword } => {
            let result = catalog
                .search(keyword.as_deref().unwrap_or_default())
                .await
                .map(|items| render::item_list(&items));
            ("Search", result)
        }
        ItemsAction::Show { id } => {
            let result = catalog
                .item_detail(id)
                .await
                .map(|item| render::item_detail(&item));
            ("Load item", result)
        }
        ItemsAction::Mine => {
            let result = catalog
                .load_my_items()
                .await
                .map(|items| render::item_list(&items));
            ("Load my items", result)
        }
        ItemsAction::Publish {
            title,
            description,
            price,
            category,
            condition,
            image,
        } => {
            let form = ItemForm {
                title,
                description,
                price,
                category,
                condition,
            };
            ("Publish", catalog.publish(form, image.as_deref()).await)
        }
        ItemsAction::Edit {
            id,
            title,
            description,
            price,
            category,
            condition,
            image,
        } => {
            let result = async {
                catalog.load_my_items().await?;
                let current = ctx.caches.items.require(id).await?;
                let form = ItemForm {
                    title: title.unwrap_or(current.title),
                    description: description.unwrap_or(current.description),
                    price: price.unwrap_or(current.price),
                    category: category.unwrap_or(current.category),
                    condition: condition.unwrap_or(current.condition),
                };
                catalog.edit(id, form, image.as_deref()).await
            }
            .await;
            ("Update", result)
        }
        ItemsAction::Delete { id } => ("Delete", catalog.delete(id).await),
    };

    finish(ctx, label, result)
}

fn parse_status(code: u8) -> Result<ItemStatus> {
    ItemStatus::try_from(code).map_err(MarketError::validation)
}
