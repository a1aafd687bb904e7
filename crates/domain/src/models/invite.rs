//! Invite domain models for sharing gatherings.
//!
//! Each gathering gets at most one invite, identified by a six-digit numeric
//! code. The code is what people type or tap from a text message, so it is
//! short, digit-only, and never changes once issued.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lowest six-digit invite code.
pub const INVITE_CODE_MIN: u32 = 100_000;

/// Highest six-digit invite code.
pub const INVITE_CODE_MAX: u32 = 999_999;

/// Lifecycle of an invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Declined => "declined",
        }
    }
}

impl FromStr for InviteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InviteStatus::Pending),
            "accepted" => Ok(InviteStatus::Accepted),
            "declined" => Ok(InviteStatus::Declined),
            _ => Err(format!("Invalid invite status: {}", s)),
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a gathering's shareable invite.
///
/// `phone_number` is a legacy field from per-phone invitations; an invite
/// carrying the caller's phone number with status `accepted` still counts as
/// membership in the listing queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: Uuid,
    pub gathering_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub status: InviteStatus,
    pub code: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
}

/// Response for invite creation/fetch: everything needed to share.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub success: bool,
    pub code: String,
    pub link: String,
    pub message: String,
}

/// Gathering summary shown on the public invite preview (no host id).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringPreview {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub date: String,
    pub time: String,
    pub address: String,
}

/// Invite summary shown on the public invite preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePreview {
    pub code: String,
    pub status: InviteStatus,
}

/// Response for the public invite preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePreviewResponse {
    pub gathering: GatheringPreview,
    pub invite: InvitePreview,
}

/// Gathering summary returned after joining (includes the host id).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedGathering {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub date: String,
    pub time: String,
    pub address: String,
    pub host_id: Uuid,
}

/// Response after joining a gathering through an invite code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGatheringResponse {
    pub success: bool,
    pub gathering: JoinedGathering,
}

/// Generate a random six-digit invite code.
pub fn generate_invite_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    rng.gen_range(INVITE_CODE_MIN..=INVITE_CODE_MAX).to_string()
}

/// Build the shareable link for an invite code.
pub fn share_link(app_base_url: &str, code: &str) -> String {
    format!("{}/invite/{}", app_base_url.trim_end_matches('/'), code)
}

/// Build the ready-to-send share message for an invite.
pub fn share_message(
    name: &str,
    date: &str,
    time: &str,
    address: &str,
    code: &str,
    link: &str,
) -> String {
    format!(
        "You're invited to \"{}\"! 🎉\n\n📅 {} at {}\n📍 {}\n\nJoin us in Watcha Bringin! Use code: {}\nOr visit: {}",
        name,
        format_share_date(date),
        time,
        address,
        code,
        link
    )
}

/// Render a stored `YYYY-MM-DD` date as `M/D/YYYY` for the share message,
/// falling back to the raw string when it does not parse.
fn format_share_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%-m/%-d/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_invite_code_is_six_digits() {
        for _ in 0..1000 {
            let code = generate_invite_code();
            assert_eq!(code.len(), 6, "code {} is not six digits", code);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(&code[0..1], "0", "code {} has a leading zero", code);
        }
    }

    #[test]
    fn test_generate_invite_code_within_range() {
        for _ in 0..1000 {
            let code: u32 = generate_invite_code().parse().unwrap();
            assert!((INVITE_CODE_MIN..=INVITE_CODE_MAX).contains(&code));
        }
    }

    #[test]
    fn test_invite_status_round_trip() {
        for value in ["pending", "accepted", "declined"] {
            let parsed = InviteStatus::from_str(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        assert!(InviteStatus::from_str("expired").is_err());
    }

    #[test]
    fn test_share_link() {
        assert_eq!(
            share_link("https://whatcha-bringin.app", "123456"),
            "https://whatcha-bringin.app/invite/123456"
        );
        // Trailing slash does not double up
        assert_eq!(
            share_link("https://whatcha-bringin.app/", "123456"),
            "https://whatcha-bringin.app/invite/123456"
        );
    }

    #[test]
    fn test_share_message_format() {
        let message = share_message(
            "Friendsgiving",
            "2025-11-27",
            "6:00 PM",
            "123 Main St",
            "654321",
            "https://whatcha-bringin.app/invite/654321",
        );

        assert_eq!(
            message,
            "You're invited to \"Friendsgiving\"! 🎉\n\n📅 11/27/2025 at 6:00 PM\n📍 123 Main St\n\nJoin us in Watcha Bringin! Use code: 654321\nOr visit: https://whatcha-bringin.app/invite/654321"
        );
    }

    #[test]
    fn test_share_message_date_is_unpadded() {
        let message = share_message(
            "Brunch",
            "2025-03-08",
            "11:00 AM",
            "9 Pine Rd",
            "111111",
            "https://whatcha-bringin.app/invite/111111",
        );
        assert!(message.contains("📅 3/8/2025 at 11:00 AM"));
    }

    #[test]
    fn test_share_message_keeps_unparseable_date() {
        let message = share_message(
            "Sometime Soon",
            "TBD",
            "7:00 PM",
            "456 Oak Ave",
            "222222",
            "https://whatcha-bringin.app/invite/222222",
        );
        assert!(message.contains("📅 TBD at 7:00 PM"));
    }
}
