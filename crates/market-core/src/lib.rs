//! Domain layer of the Campus Market client.
//!
//! Models for the marketplace resources, the shared error type, the client
//! configuration, and the traits the outer layers implement (backend
//! gateways, durable storage, notifications).

pub mod config;
pub mod error;
pub mod gateway;
pub mod item;
pub mod message;
pub mod notification;
pub mod stats;
pub mod storage;
pub mod transaction;
pub mod user;

// Re-export common error type
pub use error::{MarketError, Result};

/// Entities that are looked up by numeric id in the collection caches.
pub trait Identified {
    fn id(&self) -> i64;
}
