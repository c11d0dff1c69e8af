//! Item domain module.
//!
//! - `model`: listing, status and category types, publish/edit body
//! - `filter`: query parameters for the filtered list

mod filter;
mod model;

pub use filter::{ItemFilter, ListedWithin};
pub use model::{Item, ItemCategory, ItemDraft, ItemStatus};
