//! Infrastructure layer: local files, configuration, and image encoding.

pub mod config_service;
pub mod image_upload;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use image_upload::encode_image;
pub use paths::MarketPaths;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
