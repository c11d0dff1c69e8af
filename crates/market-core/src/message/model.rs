//! Per-transaction message models.

use serde::{Deserialize, Serialize};

/// One entry of a transaction's message thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub transaction_id: i64,
    pub sender_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_username: Option<String>,
    pub content: String,
    /// Unix seconds.
    pub send_time: i64,
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    pub fn is_sent_by(&self, username: &str) -> bool {
        self.sender_username == username
    }
}

/// Body of `POST /message`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub transaction_id: i64,
    pub content: String,
}
