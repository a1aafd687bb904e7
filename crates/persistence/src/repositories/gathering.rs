//! Gathering repository for database operations.
//!
//! Date filters compare the TEXT `date` column lexicographically; the
//! `YYYY-MM-DD` shape makes that equivalent to chronological order.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AnimatedBackgroundDb, GatheringEntity};
use crate::metrics::QueryTimer;

/// Field set for a partial gathering update. `None` leaves a column unchanged;
/// `clear_cover_image` wins over `cover_image` when both are set.
#[derive(Debug, Default)]
pub struct GatheringUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    pub cover_image: Option<String>,
    pub clear_cover_image: bool,
    pub animated_background: Option<AnimatedBackgroundDb>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub address: Option<String>,
}

/// Repository for gathering-related database operations.
#[derive(Clone)]
pub struct GatheringRepository {
    pool: PgPool,
}

impl GatheringRepository {
    /// Creates a new GatheringRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new gathering.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        image: Option<&str>,
        cover_image: Option<&str>,
        animated_background: Option<AnimatedBackgroundDb>,
        date: &str,
        time: &str,
        address: &str,
        host_id: Uuid,
    ) -> Result<GatheringEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_gathering");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            INSERT INTO gatherings (name, image, cover_image, animated_background, date, time, address, host_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, image, cover_image, animated_background, date, time, address,
                      host_id, created_at, updated_at, deleted_at
            "#,
        )
        .bind(name)
        .bind(image)
        .bind(cover_image)
        .bind(animated_background)
        .bind(date)
        .bind(time)
        .bind(address)
        .bind(host_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a gathering by ID, excluding soft-deleted rows.
    pub async fn find_active_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<GatheringEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gathering_by_id");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            SELECT id, name, image, cover_image, animated_background, date, time, address,
                   host_id, created_at, updated_at, deleted_at
            FROM gatherings
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// IDs of every gathering hosted by the user, soft-deleted included.
    /// The deletion cascade uses this to scope item cleanup.
    pub async fn list_ids_by_host(&self, host_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_gathering_ids_by_host");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM gatherings
            WHERE host_id = $1
            "#,
        )
        .bind(host_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update to an active gathering and stamp `updated_at`.
    /// Returns `None` when the gathering is missing or soft-deleted.
    pub async fn update(
        &self,
        id: Uuid,
        update: GatheringUpdate,
    ) -> Result<Option<GatheringEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_gathering");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            UPDATE gatherings
            SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                cover_image = CASE WHEN $4 THEN NULL ELSE COALESCE($5, cover_image) END,
                animated_background = COALESCE($6, animated_background),
                date = COALESCE($7, date),
                time = COALESCE($8, time),
                address = COALESCE($9, address),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, image, cover_image, animated_background, date, time, address,
                      host_id, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.image)
        .bind(update.clear_cover_image)
        .bind(update.cover_image)
        .bind(update.animated_background)
        .bind(update.date)
        .bind(update.time)
        .bind(update.address)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft delete a gathering. Returns the number of rows marked.
    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_gathering");
        let result = sqlx::query(
            r#"
            UPDATE gatherings
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Hard delete every gathering hosted by the user, soft-deleted included.
    pub async fn delete_by_host(&self, host_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_gatherings_by_host");
        let result = sqlx::query(
            r#"
            DELETE FROM gatherings
            WHERE host_id = $1
            "#,
        )
        .bind(host_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Upcoming gatherings the user hosts, soonest first.
    pub async fn list_created_upcoming(
        &self,
        host_id: Uuid,
        today: &str,
    ) -> Result<Vec<GatheringEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_created_upcoming_gatherings");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            SELECT id, name, image, cover_image, animated_background, date, time, address,
                   host_id, created_at, updated_at, deleted_at
            FROM gatherings
            WHERE host_id = $1 AND deleted_at IS NULL AND date >= $2
            ORDER BY date ASC, time ASC
            "#,
        )
        .bind(host_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Upcoming gatherings the user joined through an invite, soonest first.
    ///
    /// Membership is either a row in the invite's accepted-user set or a legacy
    /// invite addressed to the user's phone number that was accepted. Gatherings
    /// the user hosts are excluded.
    pub async fn list_joined_upcoming(
        &self,
        user_id: Uuid,
        phone_number: &str,
        today: &str,
    ) -> Result<Vec<GatheringEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_joined_upcoming_gatherings");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            SELECT g.id, g.name, g.image, g.cover_image, g.animated_background, g.date, g.time,
                   g.address, g.host_id, g.created_at, g.updated_at, g.deleted_at
            FROM gatherings g
            JOIN invites i ON i.gathering_id = g.id
            WHERE g.deleted_at IS NULL
              AND g.host_id <> $1
              AND g.date >= $3
              AND (
                  EXISTS (
                      SELECT 1 FROM invite_accepted_users au
                      WHERE au.invite_id = i.id AND au.user_id = $1
                  )
                  OR (i.phone_number = $2 AND i.status = 'accepted')
              )
            ORDER BY g.date ASC, g.time ASC
            "#,
        )
        .bind(user_id)
        .bind(phone_number)
        .bind(today)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Past gatherings the user hosted or joined, most recent first.
    pub async fn list_past(
        &self,
        user_id: Uuid,
        phone_number: &str,
        today: &str,
    ) -> Result<Vec<GatheringEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_past_gatherings");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            SELECT g.id, g.name, g.image, g.cover_image, g.animated_background, g.date, g.time,
                   g.address, g.host_id, g.created_at, g.updated_at, g.deleted_at
            FROM gatherings g
            WHERE g.deleted_at IS NULL
              AND g.date < $3
              AND (
                  g.host_id = $1
                  OR EXISTS (
                      SELECT 1 FROM invites i
                      WHERE i.gathering_id = g.id
                        AND (
                            EXISTS (
                                SELECT 1 FROM invite_accepted_users au
                                WHERE au.invite_id = i.id AND au.user_id = $1
                            )
                            OR (i.phone_number = $2 AND i.status = 'accepted')
                        )
                  )
              )
            ORDER BY g.date DESC, g.time DESC
            "#,
        )
        .bind(user_id)
        .bind(phone_number)
        .bind(today)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: GatheringRepository tests require database connection and are covered by integration tests
}
