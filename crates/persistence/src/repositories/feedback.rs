//! Feedback repository for database operations.

use sqlx::PgPool;

use crate::entities::{FeedbackEntity, FeedbackTypeDb};
use crate::metrics::QueryTimer;

/// Repository for feedback submissions.
#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Creates a new FeedbackRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Store a feedback submission.
    pub async fn insert(
        &self,
        email: &str,
        message: &str,
        feedback_type: FeedbackTypeDb,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<FeedbackEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_feedback");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            INSERT INTO feedback (email, message, feedback_type, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, message, feedback_type, ip_address, user_agent, created_at
            "#,
        )
        .bind(email)
        .bind(message)
        .bind(feedback_type)
        .bind(ip_address)
        .bind(user_agent)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
