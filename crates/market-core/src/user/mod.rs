//! User domain module.

mod model;

pub use model::{Credentials, Registration, Session};
