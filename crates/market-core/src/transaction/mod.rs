//! Transaction domain module.

mod model;

pub use model::{NewTransaction, StatusUpdate, Transaction, TransactionStatus};
