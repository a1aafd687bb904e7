//! Invite entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::InviteStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invite_status that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
pub enum InviteStatusDb {
    Pending,
    Accepted,
    Declined,
}

impl From<InviteStatusDb> for InviteStatus {
    fn from(db_value: InviteStatusDb) -> Self {
        match db_value {
            InviteStatusDb::Pending => InviteStatus::Pending,
            InviteStatusDb::Accepted => InviteStatus::Accepted,
            InviteStatusDb::Declined => InviteStatus::Declined,
        }
    }
}

impl From<InviteStatus> for InviteStatusDb {
    fn from(value: InviteStatus) -> Self {
        match value {
            InviteStatus::Pending => InviteStatusDb::Pending,
            InviteStatus::Accepted => InviteStatusDb::Accepted,
            InviteStatus::Declined => InviteStatusDb::Declined,
        }
    }
}

/// Database row mapping for the invites table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteEntity {
    pub id: Uuid,
    pub gathering_id: Uuid,
    pub phone_number: Option<String>,
    pub status: InviteStatusDb,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl From<InviteEntity> for domain::models::Invite {
    fn from(entity: InviteEntity) -> Self {
        Self {
            id: entity.id,
            gathering_id: entity.gathering_id,
            phone_number: entity.phone_number,
            status: entity.status.into(),
            code: entity.code,
            created_at: entity.created_at,
            accepted_at: entity.accepted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Invite;

    #[test]
    fn test_invite_status_conversions_cover_all_variants() {
        let all = [
            InviteStatus::Pending,
            InviteStatus::Accepted,
            InviteStatus::Declined,
        ];

        for value in all {
            let db: InviteStatusDb = value.into();
            let back: InviteStatus = db.into();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_entity_converts_to_domain_invite() {
        let entity = InviteEntity {
            id: Uuid::new_v4(),
            gathering_id: Uuid::new_v4(),
            phone_number: None,
            status: InviteStatusDb::Pending,
            code: "123456".to_string(),
            created_at: Utc::now(),
            accepted_at: None,
        };

        let invite: Invite = entity.clone().into();
        assert_eq!(invite.gathering_id, entity.gathering_id);
        assert_eq!(invite.status, InviteStatus::Pending);
        assert_eq!(invite.code, "123456");
        assert!(invite.accepted_at.is_none());
    }
}
