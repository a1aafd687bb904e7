//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub phone_number: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            phone_number: entity.phone_number,
            name: entity.name,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::User;

    #[test]
    fn test_entity_converts_to_domain_user() {
        let entity = UserEntity {
            id: Uuid::new_v4(),
            phone_number: "+15551234567".to_string(),
            name: None,
            created_at: Utc::now(),
        };

        let user: User = entity.clone().into();
        assert_eq!(user.id, entity.id);
        assert_eq!(user.phone_number, "+15551234567");
        assert!(user.name.is_none());
    }
}
