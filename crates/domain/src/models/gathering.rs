//! Gathering domain models: the events users host and join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Animated background themes the mobile client can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimatedBackground {
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

impl AnimatedBackground {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimatedBackground::Confetti => "confetti",
            AnimatedBackground::Stars => "stars",
            AnimatedBackground::Waves => "waves",
            AnimatedBackground::Gradient => "gradient",
            AnimatedBackground::Particles => "particles",
            AnimatedBackground::Rainbow => "rainbow",
            AnimatedBackground::Aurora => "aurora",
            AnimatedBackground::Bubbles => "bubbles",
            AnimatedBackground::Sparkles => "sparkles",
            AnimatedBackground::Cosmic => "cosmic",
        }
    }
}

impl FromStr for AnimatedBackground {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confetti" => Ok(AnimatedBackground::Confetti),
            "stars" => Ok(AnimatedBackground::Stars),
            "waves" => Ok(AnimatedBackground::Waves),
            "gradient" => Ok(AnimatedBackground::Gradient),
            "particles" => Ok(AnimatedBackground::Particles),
            "rainbow" => Ok(AnimatedBackground::Rainbow),
            "aurora" => Ok(AnimatedBackground::Aurora),
            "bubbles" => Ok(AnimatedBackground::Bubbles),
            "sparkles" => Ok(AnimatedBackground::Sparkles),
            "cosmic" => Ok(AnimatedBackground::Cosmic),
            _ => Err(format!("Invalid animated background: {}", s)),
        }
    }
}

impl fmt::Display for AnimatedBackground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a gathering: a potluck, party, or other hosted event.
///
/// `date` is a `YYYY-MM-DD` string and `time` a free-form display string
/// ("7:00 PM"); upcoming/past splits compare dates lexicographically.
/// `deleted_at` soft-deletes: a set marker hides the gathering from every
/// read path while the row survives until the host's account cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gathering {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated_background: Option<AnimatedBackground>,
    pub date: String,
    pub time: String,
    pub address: String,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Request to create a gathering.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatheringRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// Hosted image URL or inline base64 payload to upload.
    pub image: Option<String>,

    /// Inline base64 payload for the cover image.
    pub cover_image: Option<String>,

    pub animated_background: Option<AnimatedBackground>,

    #[validate(custom(function = "shared::validation::validate_calendar_date"))]
    pub date: String,

    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

/// Request to update a gathering. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGatheringRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_calendar_date"))]
    pub date: Option<String>,

    #[validate(length(min = 1, message = "Time is required"))]
    pub time: Option<String>,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: Option<String>,

    pub cover_image: Option<String>,

    pub animated_background: Option<AnimatedBackground>,

    /// Clears the stored cover image; wins over `cover_image` when both are set.
    pub remove_cover_image: Option<bool>,
}

/// Request to update only the visual theme of a gathering.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThemeRequest {
    pub cover_image: Option<String>,

    pub animated_background: Option<AnimatedBackground>,

    pub remove_cover_image: Option<bool>,
}

/// Upcoming gatherings, split between hosting and attending.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingGatheringsResponse {
    pub created: Vec<Gathering>,
    pub joined: Vec<Gathering>,
}

/// Past gatherings, hosted and joined together.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PastGatheringsResponse {
    pub past: Vec<Gathering>,
}

/// Response after soft-deleting a gathering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGatheringResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::address::en::StreetName;
    use fake::Fake;

    fn valid_create_request() -> CreateGatheringRequest {
        CreateGatheringRequest {
            name: "Friendsgiving".to_string(),
            image: None,
            cover_image: None,
            animated_background: Some(AnimatedBackground::Confetti),
            date: "2025-11-27".to_string(),
            time: "6:00 PM".to_string(),
            address: StreetName().fake(),
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(valid_create_request().validate().is_ok());

        let mut missing_name = valid_create_request();
        missing_name.name = String::new();
        assert!(missing_name.validate().is_err());

        let mut bad_date = valid_create_request();
        bad_date.date = "next friday".to_string();
        assert!(bad_date.validate().is_err());

        let mut missing_address = valid_create_request();
        missing_address.address = String::new();
        assert!(missing_address.validate().is_err());
    }

    #[test]
    fn test_update_request_validates_present_fields_only() {
        let empty = UpdateGatheringRequest::default();
        assert!(empty.validate().is_ok());

        let bad_date = UpdateGatheringRequest {
            date: Some("2025-2-3".to_string()),
            ..Default::default()
        };
        assert!(bad_date.validate().is_err());

        let empty_name = UpdateGatheringRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_animated_background_round_trip() {
        for value in [
            "confetti",
            "stars",
            "waves",
            "gradient",
            "particles",
            "rainbow",
            "aurora",
            "bubbles",
            "sparkles",
            "cosmic",
        ] {
            let parsed = AnimatedBackground::from_str(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        assert!(AnimatedBackground::from_str("plasma").is_err());
    }

    #[test]
    fn test_animated_background_deserializes_from_lowercase() {
        let request: CreateGatheringRequest = serde_json::from_str(
            r#"{
                "name": "Game Night",
                "date": "2025-10-03",
                "time": "8:00 PM",
                "address": "12 Elm St",
                "animatedBackground": "aurora"
            }"#,
        )
        .unwrap();
        assert_eq!(
            request.animated_background,
            Some(AnimatedBackground::Aurora)
        );
    }

    #[test]
    fn test_gathering_wire_format() {
        let gathering = Gathering {
            id: Uuid::new_v4(),
            name: "Taco Tuesday".to_string(),
            image: None,
            cover_image: Some("https://example.com/cover.jpg".to_string()),
            animated_background: None,
            date: "2025-09-09".to_string(),
            time: "7:00 PM".to_string(),
            address: "456 Oak Ave".to_string(),
            host_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };

        let json = serde_json::to_value(&gathering).unwrap();
        assert!(json.get("hostId").is_some());
        assert!(json.get("coverImage").is_some());
        assert!(json.get("deletedAt").is_none());
    }
}
