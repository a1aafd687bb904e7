//! User domain model and phone-auth DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents a phone-verified account.
///
/// Users are keyed by their normalized phone number; the first send-code
/// request creates the row. `name` starts empty and is filled in the first
/// time the user claims an item under a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to send a verification code to a phone number.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeRequest {
    #[validate(custom(function = "shared::validation::validate_phone_number"))]
    pub phone_number: String,
}

/// Response after dispatching (or skipping) a verification code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeResponse {
    pub success: bool,
    pub message: String,
}

/// Request to verify a previously sent code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    #[validate(custom(function = "shared::validation::validate_phone_number"))]
    pub phone_number: String,

    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

/// Response after successful verification: bearer token plus the account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Response after the account-deletion cascade completes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_code_request_validation() {
        let valid = SendCodeRequest {
            phone_number: "+15551234567".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = SendCodeRequest {
            phone_number: "(555) 123-4567".to_string(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_verify_code_request_requires_six_digits() {
        let valid = VerifyCodeRequest {
            phone_number: "+15551234567".to_string(),
            code: "123456".to_string(),
        };
        assert!(valid.validate().is_ok());

        let too_short = VerifyCodeRequest {
            phone_number: "+15551234567".to_string(),
            code: "1234".to_string(),
        };
        assert!(too_short.validate().is_err());

        let too_long = VerifyCodeRequest {
            phone_number: "+15551234567".to_string(),
            code: "1234567".to_string(),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: Uuid::new_v4(),
            phone_number: "+15551234567".to_string(),
            name: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("phoneNumber").is_some());
        assert!(json.get("createdAt").is_some());
        // Absent name is omitted rather than serialized as null
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_send_code_request_accepts_camel_case() {
        let request: SendCodeRequest =
            serde_json::from_str(r#"{"phoneNumber": "+15551234567"}"#).unwrap();
        assert_eq!(request.phone_number, "+15551234567");
    }
}
