//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, phone_number, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the user for a normalized phone number, creating the row on first sight.
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on conflict,
    /// so concurrent first sign-ins converge on a single user.
    pub async fn find_or_create_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("find_or_create_user_by_phone");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (phone_number)
            VALUES ($1)
            ON CONFLICT (phone_number) DO UPDATE SET phone_number = EXCLUDED.phone_number
            RETURNING id, phone_number, name, created_at
            "#,
        )
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the user's display name.
    pub async fn update_name(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user_name");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET name = $2
            WHERE id = $1
            RETURNING id, phone_number, name, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Hard delete a user row. Returns the number of rows removed.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user_by_id");
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
