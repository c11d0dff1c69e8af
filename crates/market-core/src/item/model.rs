//! Item domain model.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::Identified;

/// Availability of a listed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ItemStatus {
    Available = 0,
    Reserved = 1,
    Sold = 2,
    /// Reported by the backend for withdrawn listings.
    Cancelled = 3,
}

impl ItemStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<u8> for ItemStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Available),
            1 => Ok(Self::Reserved),
            2 => Ok(Self::Sold),
            3 => Ok(Self::Cancelled),
            other => Err(format!("unknown item status code {other}")),
        }
    }
}

impl From<ItemStatus> for u8 {
    fn from(status: ItemStatus) -> Self {
        status as u8
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Item category as the client labels it.
///
/// Codes 1..=5 are the categories offered by the publish form; any other code
/// is shown as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Electronics,
    Clothing,
    Books,
    DailyGoods,
    Sports,
    Other,
}

impl ItemCategory {
    pub const SELECTABLE: [ItemCategory; 5] = [
        Self::Electronics,
        Self::Clothing,
        Self::Books,
        Self::DailyGoods,
        Self::Sports,
    ];

    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Electronics,
            2 => Self::Clothing,
            3 => Self::Books,
            4 => Self::DailyGoods,
            5 => Self::Sports,
            _ => Self::Other,
        }
    }

    /// Wire code; `None` for `Other`, which has no selectable code.
    pub fn code(self) -> Option<u8> {
        match self {
            Self::Electronics => Some(1),
            Self::Clothing => Some(2),
            Self::Books => Some(3),
            Self::DailyGoods => Some(4),
            Self::Sports => Some(5),
            Self::Other => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Books => "books",
            Self::DailyGoods => "daily goods",
            Self::Sports => "sports",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A listing as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_name: Option<String>,
    #[serde(default)]
    pub condition: String,
    /// Data URI or path of the picture; the backend sends `""` when absent.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image_path: Option<String>,
    pub owner_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<i64>,
}

impl Item {
    pub fn category(&self) -> ItemCategory {
        ItemCategory::from_code(self.category)
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner_username == username
    }
}

impl Identified for Item {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Body of item publish (`POST /item`) and edit (`PUT /item/{id}`).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: u8,
    pub condition: String,
    /// Always sent; an absent image goes out as `""`.
    #[serde(serialize_with = "none_as_empty_string")]
    pub image_path: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn none_as_empty_string<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
