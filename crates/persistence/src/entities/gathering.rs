//! Gathering entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::AnimatedBackground;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for animated_background that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "animated_background", rename_all = "lowercase")]
pub enum AnimatedBackgroundDb {
    Confetti,
    Stars,
    Waves,
    Gradient,
    Particles,
    Rainbow,
    Aurora,
    Bubbles,
    Sparkles,
    Cosmic,
}

impl From<AnimatedBackgroundDb> for AnimatedBackground {
    fn from(db_value: AnimatedBackgroundDb) -> Self {
        match db_value {
            AnimatedBackgroundDb::Confetti => AnimatedBackground::Confetti,
            AnimatedBackgroundDb::Stars => AnimatedBackground::Stars,
            AnimatedBackgroundDb::Waves => AnimatedBackground::Waves,
            AnimatedBackgroundDb::Gradient => AnimatedBackground::Gradient,
            AnimatedBackgroundDb::Particles => AnimatedBackground::Particles,
            AnimatedBackgroundDb::Rainbow => AnimatedBackground::Rainbow,
            AnimatedBackgroundDb::Aurora => AnimatedBackground::Aurora,
            AnimatedBackgroundDb::Bubbles => AnimatedBackground::Bubbles,
            AnimatedBackgroundDb::Sparkles => AnimatedBackground::Sparkles,
            AnimatedBackgroundDb::Cosmic => AnimatedBackground::Cosmic,
        }
    }
}

impl From<AnimatedBackground> for AnimatedBackgroundDb {
    fn from(value: AnimatedBackground) -> Self {
        match value {
            AnimatedBackground::Confetti => AnimatedBackgroundDb::Confetti,
            AnimatedBackground::Stars => AnimatedBackgroundDb::Stars,
            AnimatedBackground::Waves => AnimatedBackgroundDb::Waves,
            AnimatedBackground::Gradient => AnimatedBackgroundDb::Gradient,
            AnimatedBackground::Particles => AnimatedBackgroundDb::Particles,
            AnimatedBackground::Rainbow => AnimatedBackgroundDb::Rainbow,
            AnimatedBackground::Aurora => AnimatedBackgroundDb::Aurora,
            AnimatedBackground::Bubbles => AnimatedBackgroundDb::Bubbles,
            AnimatedBackground::Sparkles => AnimatedBackgroundDb::Sparkles,
            AnimatedBackground::Cosmic => AnimatedBackgroundDb::Cosmic,
        }
    }
}

/// Database row mapping for the gatherings table.
#[derive(Debug, Clone, FromRow)]
pub struct GatheringEntity {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub cover_image: Option<String>,
    pub animated_background: Option<AnimatedBackgroundDb>,
    pub date: String,
    pub time: String,
    pub address: String,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<GatheringEntity> for domain::models::Gathering {
    fn from(entity: GatheringEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            image: entity.image,
            cover_image: entity.cover_image,
            animated_background: entity.animated_background.map(Into::into),
            date: entity.date,
            time: entity.time,
            address: entity.address,
            host_id: entity.host_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Gathering;
    use fake::faker::company::en::CompanyName;
    use fake::Fake;

    #[test]
    fn test_animated_background_conversions_cover_all_variants() {
        let all = [
            AnimatedBackground::Confetti,
            AnimatedBackground::Stars,
            AnimatedBackground::Waves,
            AnimatedBackground::Gradient,
            AnimatedBackground::Particles,
            AnimatedBackground::Rainbow,
            AnimatedBackground::Aurora,
            AnimatedBackground::Bubbles,
            AnimatedBackground::Sparkles,
            AnimatedBackground::Cosmic,
        ];

        for value in all {
            let db: AnimatedBackgroundDb = value.into();
            let back: AnimatedBackground = db.into();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_entity_converts_to_domain_gathering() {
        let entity = GatheringEntity {
            id: Uuid::new_v4(),
            name: CompanyName().fake(),
            image: None,
            cover_image: Some("https://example.com/cover.jpg".to_string()),
            animated_background: Some(AnimatedBackgroundDb::Stars),
            date: "2025-10-31".to_string(),
            time: "7:00 PM".to_string(),
            address: "13 Hollow Ln".to_string(),
            host_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };

        let gathering: Gathering = entity.clone().into();
        assert_eq!(gathering.id, entity.id);
        assert_eq!(
            gathering.animated_background,
            Some(AnimatedBackground::Stars)
        );
        assert_eq!(gathering.date, "2025-10-31");
        assert!(gathering.deleted_at.is_none());
    }
}
