//! Feedback entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::FeedbackType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for feedback_type that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "feedback_type", rename_all = "kebab-case")]
pub enum FeedbackTypeDb {
    Praise,
    Bug,
    FeatureRequest,
    Other,
}

impl From<FeedbackTypeDb> for FeedbackType {
    fn from(db_value: FeedbackTypeDb) -> Self {
        match db_value {
            FeedbackTypeDb::Praise => FeedbackType::Praise,
            FeedbackTypeDb::Bug => FeedbackType::Bug,
            FeedbackTypeDb::FeatureRequest => FeedbackType::FeatureRequest,
            FeedbackTypeDb::Other => FeedbackType::Other,
        }
    }
}

impl From<FeedbackType> for FeedbackTypeDb {
    fn from(value: FeedbackType) -> Self {
        match value {
            FeedbackType::Praise => FeedbackTypeDb::Praise,
            FeedbackType::Bug => FeedbackTypeDb::Bug,
            FeedbackType::FeatureRequest => FeedbackTypeDb::FeatureRequest,
            FeedbackType::Other => FeedbackTypeDb::Other,
        }
    }
}

/// Database row mapping for the feedback table.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackEntity {
    pub id: Uuid,
    pub email: String,
    pub message: String,
    pub feedback_type: FeedbackTypeDb,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackEntity> for domain::models::Feedback {
    fn from(entity: FeedbackEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            message: entity.message,
            feedback_type: entity.feedback_type.into(),
            ip_address: entity.ip_address,
            user_agent: entity.user_agent,
            created_at: entity.created_at,
        }
    }
}
