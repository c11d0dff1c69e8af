//! Transaction domain model and its status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Identified;

/// Lifecycle of a transaction.
///
/// Progression is forward-only: `Pending -> Confirmed -> Completed`, and
/// `Cancelled` is reachable from `Pending` or `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TransactionStatus {
    Pending = 0,
    Confirmed = 1,
    Completed = 2,
    Cancelled = 3,
}

impl TransactionStatus {
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Confirmed, Completed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }

    /// Statuses reachable from this one, in display order.
    pub fn next_statuses(self) -> &'static [TransactionStatus] {
        use TransactionStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<u8> for TransactionStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Confirmed),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Cancelled),
            other => Err(format!("unknown transaction status code {other}")),
        }
    }
}

impl From<TransactionStatus> for u8 {
    fn from(status: TransactionStatus) -> Self {
        status as u8
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub item_id: i64,
    pub seller_username: String,
    pub buyer_username: String,
    pub price: f64,
    pub status: TransactionStatus,
    #[serde(default)]
    pub status_name: String,
    #[serde(default)]
    pub create_time: i64,
    /// Unix seconds; `0` until the transaction completes.
    #[serde(default)]
    pub complete_time: i64,
}

impl Transaction {
    /// The other party of the transaction as seen by `username`.
    pub fn counterpart_of(&self, username: &str) -> &str {
        if self.buyer_username == username {
            &self.seller_username
        } else {
            &self.buyer_username
        }
    }

    pub fn completed_at(&self) -> Option<i64> {
        (self.complete_time > 0).then_some(self.complete_time)
    }
}

impl Identified for Transaction {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Body of `POST /transaction`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub item_id: i64,
}

/// Body of `PUT /transaction/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: TransactionStatus,
}
