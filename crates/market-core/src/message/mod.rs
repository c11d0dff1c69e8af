//! Message domain module.

mod model;

pub use model::{Message, NewMessage};
