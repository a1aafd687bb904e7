//! Invite repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InviteEntity, InviteStatusDb};
use crate::metrics::QueryTimer;

/// Repository for invite-related database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the invite for a gathering.
    pub async fn create(
        &self,
        gathering_id: Uuid,
        code: &str,
    ) -> Result<InviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            INSERT INTO invites (gathering_id, code)
            VALUES ($1, $2)
            RETURNING id, gathering_id, phone_number, status, code, created_at, accepted_at
            "#,
        )
        .bind(gathering_id)
        .bind(code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the invite for a gathering.
    pub async fn find_by_gathering(
        &self,
        gathering_id: Uuid,
    ) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_gathering");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, gathering_id, phone_number, status, code, created_at, accepted_at
            FROM invites
            WHERE gathering_id = $1
            "#,
        )
        .bind(gathering_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_code");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, gathering_id, phone_number, status, code, created_at, accepted_at
            FROM invites
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark an invite accepted, stamping `accepted_at` the first time only.
    pub async fn mark_accepted(&self, id: Uuid) -> Result<InviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("mark_invite_accepted");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            UPDATE invites
            SET status = $2, accepted_at = COALESCE(accepted_at, NOW())
            WHERE id = $1
            RETURNING id, gathering_id, phone_number, status, code, created_at, accepted_at
            "#,
        )
        .bind(id)
        .bind(InviteStatusDb::Accepted)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a user to an invite's accepted-user set.
    ///
    /// The composite primary key plus `ON CONFLICT DO NOTHING` gives the set
    /// true set semantics: joining twice leaves one membership and returns 0.
    pub async fn add_accepted_user(
        &self,
        invite_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("add_invite_accepted_user");
        let result = sqlx::query(
            r#"
            INSERT INTO invite_accepted_users (invite_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(invite_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Remove a user from every invite's accepted-user set.
    pub async fn remove_user_from_all(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_user_from_invites");
        let result = sqlx::query(
            r#"
            DELETE FROM invite_accepted_users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Check if code exists.
    pub async fn code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_invite_code_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM invites WHERE code = $1)
            "#,
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Generate unique invite code by retrying if collision.
    pub async fn generate_unique_code<F>(&self, generator: F) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        let mut code = generator();
        let mut attempts = 0;

        while self.code_exists(&code).await? {
            code = generator();
            attempts += 1;
            if attempts > 100 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique invite code".to_string(),
                ));
            }
        }

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    // Note: InviteRepository tests require database connection and are covered by integration tests
}
