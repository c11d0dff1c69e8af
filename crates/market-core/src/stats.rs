//! Aggregate counters shown on the home screen and the profile page.

use std::fmt;

/// Which `/*/count` endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountTarget {
    Users,
    Items,
    Transactions,
}

impl CountTarget {
    pub fn path(self) -> &'static str {
        match self {
            Self::Users => "user/count",
            Self::Items => "item/count",
            Self::Transactions => "transaction/count",
        }
    }
}

impl fmt::Display for CountTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Users => "users",
            Self::Items => "items",
            Self::Transactions => "transactions",
        };
        f.write_str(label)
    }
}

/// Site-wide counters. `None` means the backend declined to report it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemStats {
    pub users: Option<u64>,
    pub items: Option<u64>,
    pub transactions: Option<u64>,
}

impl SystemStats {
    /// All counters at zero, shown when the backend is unreachable.
    pub fn zeroed() -> Self {
        Self {
            users: Some(0),
            items: Some(0),
            transactions: Some(0),
        }
    }
}

/// Per-user counters on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStats {
    pub my_items: usize,
    /// Only transactions in the `Completed` status are counted.
    pub completed_transactions: usize,
    pub favorites: usize,
    pub credit_score: i32,
}
