//! Feedback domain models and the support-form issue pipeline.
//!
//! Feedback from the public form is stored, then fanned out to a notification
//! email and, for bugs and feature requests, a tracker issue. The issue title
//! is derived from the message's first sentence so triage can read the list
//! without opening every issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Maximum length of a generated issue title.
pub const MAX_TITLE_LENGTH: usize = 80;

/// Category of a feedback submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackType {
    Praise,
    Bug,
    FeatureRequest,
    Other,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Praise => "praise",
            FeedbackType::Bug => "bug",
            FeedbackType::FeatureRequest => "feature-request",
            FeedbackType::Other => "other",
        }
    }

    /// Human label used in notification email subjects.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackType::Praise => "Praise",
            FeedbackType::Bug => "Bug Report",
            FeedbackType::FeatureRequest => "Feature Request",
            FeedbackType::Other => "Feedback",
        }
    }

    /// Whether this submission should open a tracker issue.
    pub fn opens_issue(&self) -> bool {
        matches!(self, FeedbackType::Bug | FeedbackType::FeatureRequest)
    }

    /// Title prefix for the tracker issue.
    pub fn issue_prefix(&self) -> &'static str {
        match self {
            FeedbackType::Bug => "Bug",
            _ => "Feature request",
        }
    }
}

impl FromStr for FeedbackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "praise" => Ok(FeedbackType::Praise),
            "bug" => Ok(FeedbackType::Bug),
            "feature-request" => Ok(FeedbackType::FeatureRequest),
            "other" => Ok(FeedbackType::Other),
            _ => Err(format!("Invalid feedback type: {}", s)),
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a stored feedback submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub email: String,
    pub message: String,
    pub feedback_type: FeedbackType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request from the public feedback form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "Message must be between 10 and 2000 characters"
    ))]
    pub message: String,

    #[serde(rename = "type")]
    pub feedback_type: Option<FeedbackType>,

    #[validate(length(min = 1, message = "reCAPTCHA token is required"))]
    pub recaptcha_token: String,
}

/// Response after accepting a feedback submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}

lazy_static::lazy_static! {
    static ref WHITESPACE_RUN: regex::Regex = regex::Regex::new(r"\s+").unwrap();
    static ref FIRST_SENTENCE: regex::Regex = regex::Regex::new(r"^.*?[.!?](\s|$)").unwrap();
}

/// Collapse runs of whitespace into single spaces and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// First sentence of the text (through `.`, `!`, or `?`), or the whole text
/// when no sentence boundary is found.
fn first_sentence(text: &str) -> String {
    match FIRST_SENTENCE.find(text) {
        Some(m) => m.as_str().trim_end().to_string(),
        None => text.to_string(),
    }
}

/// Clip text to `limit` characters, replacing the tail with `…` when needed.
fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(limit.saturating_sub(1)).collect();
    clipped.truncate(clipped.trim_end().len());
    clipped.push('…');
    clipped
}

/// Build a tracker issue title from a feedback message.
///
/// The title is `{prefix}: {first sentence}`, clipped so the whole thing fits
/// in [`MAX_TITLE_LENGTH`] characters. An empty message falls back to
/// `{prefix}: Support form submission`.
pub fn build_issue_title(message: &str, prefix: &str) -> String {
    let summary = first_sentence(&collapse_whitespace(message));
    if summary.is_empty() {
        return format!("{}: Support form submission", prefix);
    }

    let available = MAX_TITLE_LENGTH
        .saturating_sub(prefix.chars().count() + 2)
        .max(10);
    format!("{}: {}", prefix, clip(&summary, available))
}

/// Build the tracker issue body: the message plus reporter details.
pub fn build_issue_body(message: &str, email: &str, feedback_type: FeedbackType) -> String {
    format!(
        "{}\n\n---\nReporter email: {}\nType: {}",
        message, email, feedback_type
    )
}

/// Labels to attach to the tracker issue.
pub fn issue_labels(feedback_type: FeedbackType) -> Vec<&'static str> {
    vec!["support-form", feedback_type.as_str()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_round_trip() {
        for value in ["praise", "bug", "feature-request", "other"] {
            let parsed = FeedbackType::from_str(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        assert!(FeedbackType::from_str("complaint").is_err());
    }

    #[test]
    fn test_feedback_type_kebab_case_on_the_wire() {
        let request: CreateFeedbackRequest = serde_json::from_str(
            r#"{
                "email": "user@example.com",
                "message": "The claim button does nothing",
                "type": "feature-request",
                "recaptchaToken": "dev-token"
            }"#,
        )
        .unwrap();
        assert_eq!(request.feedback_type, Some(FeedbackType::FeatureRequest));
    }

    #[test]
    fn test_feedback_type_labels() {
        assert_eq!(FeedbackType::Praise.label(), "Praise");
        assert_eq!(FeedbackType::Bug.label(), "Bug Report");
        assert_eq!(FeedbackType::FeatureRequest.label(), "Feature Request");
        assert_eq!(FeedbackType::Other.label(), "Feedback");
    }

    #[test]
    fn test_only_bugs_and_feature_requests_open_issues() {
        assert!(FeedbackType::Bug.opens_issue());
        assert!(FeedbackType::FeatureRequest.opens_issue());
        assert!(!FeedbackType::Praise.opens_issue());
        assert!(!FeedbackType::Other.opens_issue());
    }

    #[test]
    fn test_build_issue_title_empty_message_uses_fallback() {
        assert_eq!(build_issue_title("", "Bug"), "Bug: Support form submission");
        assert_eq!(
            build_issue_title("   \n\t  ", "Feature"),
            "Feature: Support form submission"
        );
    }

    #[test]
    fn test_build_issue_title_uses_first_sentence() {
        let title = build_issue_title(
            "  Something broke here. Additional info follows.",
            "Bug",
        );
        assert_eq!(title, "Bug: Something broke here.");
    }

    #[test]
    fn test_build_issue_title_clips_long_messages() {
        let message = "a".repeat(200);
        let title = build_issue_title(&message, "Bug");

        assert!(title.starts_with("Bug: "));
        assert!(title.ends_with('…'));
        assert!(title.chars().count() <= MAX_TITLE_LENGTH);
    }

    #[test]
    fn test_build_issue_title_custom_prefix() {
        let title = build_issue_title("Need dark mode soon please", "Feature request");
        assert_eq!(title, "Feature request: Need dark mode soon please");
    }

    #[test]
    fn test_build_issue_title_collapses_whitespace() {
        let title = build_issue_title("claim\n\nbutton\t\tbroken on iOS!", "Bug");
        assert_eq!(title, "Bug: claim button broken on iOS!");
    }

    #[test]
    fn test_first_sentence_stops_at_any_terminator() {
        assert_eq!(first_sentence("Broken! And more."), "Broken!");
        assert_eq!(first_sentence("Why? Because."), "Why?");
        assert_eq!(first_sentence("no terminator at all"), "no terminator at all");
    }

    #[test]
    fn test_build_issue_body() {
        let body = build_issue_body("It crashed", "user@example.com", FeedbackType::Bug);
        assert_eq!(
            body,
            "It crashed\n\n---\nReporter email: user@example.com\nType: bug"
        );
    }

    #[test]
    fn test_issue_labels() {
        assert_eq!(issue_labels(FeedbackType::Bug), vec!["support-form", "bug"]);
        assert_eq!(
            issue_labels(FeedbackType::FeatureRequest),
            vec!["support-form", "feature-request"]
        );
    }

    #[test]
    fn test_create_feedback_request_validation() {
        let valid = CreateFeedbackRequest {
            email: "user@example.com".to_string(),
            message: "The invite link 404s on Android".to_string(),
            feedback_type: Some(FeedbackType::Bug),
            recaptcha_token: "dev-token".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreateFeedbackRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_message = CreateFeedbackRequest {
            message: "too short".to_string(),
            ..valid.clone()
        };
        assert!(short_message.validate().is_err());

        let long_message = CreateFeedbackRequest {
            message: "x".repeat(2001),
            ..valid.clone()
        };
        assert!(long_message.validate().is_err());

        let missing_token = CreateFeedbackRequest {
            recaptcha_token: String::new(),
            ..valid
        };
        assert!(missing_token.validate().is_err());
    }
}
