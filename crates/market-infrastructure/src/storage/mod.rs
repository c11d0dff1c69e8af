//! Storage layer.
//!
//! - `atomic_file`: atomic JSON/TOML file handle with locking
//! - `file_key_value_store`: durable `KeyValueStore` on a single JSON file
//! - `memory_key_value_store`: in-process `KeyValueStore`

mod atomic_file;
mod file_key_value_store;
mod memory_key_value_store;

pub use atomic_file::{AtomicFile, AtomicFileError, FileFormat};
pub use file_key_value_store::FileKeyValueStore;
pub use memory_key_value_store::MemoryKeyValueStore;
