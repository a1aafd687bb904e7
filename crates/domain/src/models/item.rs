//! Item domain models: the food and drink people bring to a gathering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Category of an item on a gathering's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Food,
    Drink,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Food => "food",
            ItemType::Drink => "drink",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(ItemType::Food),
            "drink" => Ok(ItemType::Drink),
            _ => Err(format!("Invalid item type: {}", s)),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an item a guest can claim to bring.
///
/// The three claim fields move together: all set while claimed, all null
/// otherwise. `claimed_by_name` is the display name typed at claim time, not
/// a profile lookup, so it survives exactly as entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub gathering_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Whether the item is currently claimed by the given user.
    pub fn is_claimed_by(&self, user_id: Uuid) -> bool {
        self.claimed_by == Some(user_id)
    }
}

/// Request to add an item to a gathering.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,
}

/// Request to claim or unclaim an item.
///
/// `name` is required for a claim but irrelevant for the unclaim toggle, so
/// the handler enforces it rather than the derive.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItemRequest {
    pub item_id: Uuid,

    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description is too long"))]
    pub custom_description: Option<String>,
}

/// Response after removing an item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemResponse {
    pub success: bool,
}
