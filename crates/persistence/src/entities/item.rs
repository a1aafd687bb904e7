//! Item entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::ItemType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for item_type that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "item_type", rename_all = "lowercase")]
pub enum ItemTypeDb {
    Food,
    Drink,
}

impl From<ItemTypeDb> for ItemType {
    fn from(db_value: ItemTypeDb) -> Self {
        match db_value {
            ItemTypeDb::Food => ItemType::Food,
            ItemTypeDb::Drink => ItemType::Drink,
        }
    }
}

impl From<ItemType> for ItemTypeDb {
    fn from(value: ItemType) -> Self {
        match value {
            ItemType::Food => ItemTypeDb::Food,
            ItemType::Drink => ItemTypeDb::Drink,
        }
    }
}

/// Database row mapping for the items table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemEntity {
    pub id: Uuid,
    pub name: String,
    pub item_type: ItemTypeDb,
    pub gathering_id: Uuid,
    pub claimed_by: Option<Uuid>,
    pub claimed_by_name: Option<String>,
    pub custom_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ItemEntity> for domain::models::Item {
    fn from(entity: ItemEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            item_type: entity.item_type.into(),
            gathering_id: entity.gathering_id,
            claimed_by: entity.claimed_by,
            claimed_by_name: entity.claimed_by_name,
            custom_description: entity.custom_description,
            created_at: entity.created_at,
        }
    }
}
