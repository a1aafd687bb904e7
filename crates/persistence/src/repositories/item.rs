//! Item repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ItemEntity, ItemTypeDb};
use crate::metrics::QueryTimer;

/// Repository for item-related database operations.
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Creates a new ItemRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new item on a gathering.
    pub async fn create(
        &self,
        gathering_id: Uuid,
        name: &str,
        item_type: ItemTypeDb,
    ) -> Result<ItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_item");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            INSERT INTO items (gathering_id, name, item_type)
            VALUES ($1, $2, $3)
            RETURNING id, name, item_type, gathering_id, claimed_by, claimed_by_name,
                      custom_description, created_at
            "#,
        )
        .bind(gathering_id)
        .bind(name)
        .bind(item_type)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an item by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_item_by_id");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT id, name, item_type, gathering_id, claimed_by, claimed_by_name,
                   custom_description, created_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a gathering's items in creation order.
    pub async fn list_by_gathering(
        &self,
        gathering_id: Uuid,
    ) -> Result<Vec<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_items_by_gathering");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT id, name, item_type, gathering_id, claimed_by, claimed_by_name,
                   custom_description, created_at
            FROM items
            WHERE gathering_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(gathering_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Claim an unclaimed item for a user.
    ///
    /// The `claimed_by IS NULL` guard makes the claim atomic: when another user
    /// already holds the item the update matches no row and `None` comes back,
    /// which callers surface as a conflict.
    pub async fn claim(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        claimed_by_name: &str,
        custom_description: Option<&str>,
    ) -> Result<Option<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("claim_item");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            UPDATE items
            SET claimed_by = $2, claimed_by_name = $3, custom_description = $4
            WHERE id = $1 AND claimed_by IS NULL
            RETURNING id, name, item_type, gathering_id, claimed_by, claimed_by_name,
                      custom_description, created_at
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(claimed_by_name)
        .bind(custom_description)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Release a user's claim, clearing all three claim fields together.
    /// Returns `None` when the user does not hold the claim.
    pub async fn unclaim(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("unclaim_item");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            UPDATE items
            SET claimed_by = NULL, claimed_by_name = NULL, custom_description = NULL
            WHERE id = $1 AND claimed_by = $2
            RETURNING id, name, item_type, gathering_id, claimed_by, claimed_by_name,
                      custom_description, created_at
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an item, scoped to its gathering. Returns the number of rows removed.
    pub async fn delete_scoped(
        &self,
        item_id: Uuid,
        gathering_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_item");
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE id = $1 AND gathering_id = $2
            "#,
        )
        .bind(item_id)
        .bind(gathering_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete every item belonging to the given gatherings.
    pub async fn delete_by_gatherings(&self, gathering_ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_items_by_gatherings");
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE gathering_id = ANY($1)
            "#,
        )
        .bind(gathering_ids)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Clear a user's claims everywhere. Returns the number of items released.
    pub async fn unclaim_all_for_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("unclaim_all_items_for_user");
        let result = sqlx::query(
            r#"
            UPDATE items
            SET claimed_by = NULL, claimed_by_name = NULL, custom_description = NULL
            WHERE claimed_by = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: ItemRepository tests require database connection and are covered by integration tests
}
