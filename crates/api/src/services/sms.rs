//! SMS verification service for phone sign-in.
//!
//! Supports multiple providers:
//! - `console`: Logs dispatches and accepts the configured test code (development)
//! - `twilio`: Twilio Verify v2 API
//!
//! Two kinds of numbers bypass the provider entirely: the configured
//! app-store review account, and `+1555` dev numbers when test numbers are
//! enabled. Neither ever receives a real SMS.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::SmsConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Prefix that marks a dev-mode number when test numbers are enabled.
const DEV_NUMBER_PREFIX: &str = "+1555";

/// Fixed code accepted for dev-mode numbers.
const DEV_NUMBER_CODE: &str = "123456";

/// Errors that can occur during SMS verification.
#[derive(Debug, Error)]
pub enum SmsError {
    #[error("Invalid phone number")]
    InvalidNumber,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid or expired verification code")]
    InvalidCode,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("SMS service not configured")]
    NotConfigured,
}

/// How a verification code was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationDispatch {
    /// Code sent through the provider.
    Sent,
    /// App-store review account; no SMS goes out.
    TestAccount,
    /// Dev-mode number; the fixed code applies.
    DevNumber,
    /// Console provider; code logged instead of sent.
    Console,
}

impl VerificationDispatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationDispatch::Sent => "sent",
            VerificationDispatch::TestAccount => "test_account",
            VerificationDispatch::DevNumber => "dev_number",
            VerificationDispatch::Console => "console",
        }
    }
}

/// Twilio Verify check response.
#[derive(Debug, Deserialize)]
struct TwilioVerificationCheck {
    status: String,
}

/// Twilio error payload; `code` carries the numeric Twilio error code.
#[derive(Debug, Default, Deserialize)]
struct TwilioErrorResponse {
    code: Option<i64>,
    message: Option<String>,
}

/// SMS verification service.
#[derive(Clone)]
pub struct SmsService {
    config: Arc<SmsConfig>,
    client: Client,
}

impl SmsService {
    /// Creates a new SmsService with the given configuration.
    pub fn new(config: SmsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Whether this number is the configured app-store review account.
    fn is_test_account(&self, phone_number: &str) -> bool {
        !self.config.test_phone_number.is_empty() && phone_number == self.config.test_phone_number
    }

    /// Whether this number short-circuits as a dev-mode number.
    fn is_dev_number(&self, phone_number: &str) -> bool {
        self.config.allow_test_numbers && phone_number.starts_with(DEV_NUMBER_PREFIX)
    }

    /// Dispatch a verification code to the given (normalized) phone number.
    pub async fn send_verification_code(
        &self,
        phone_number: &str,
    ) -> Result<VerificationDispatch, SmsError> {
        if self.is_test_account(phone_number) {
            debug!(phone_number = %phone_number, "Test account, skipping SMS dispatch");
            return Ok(VerificationDispatch::TestAccount);
        }

        if self.is_dev_number(phone_number) {
            debug!(phone_number = %phone_number, "Dev number, skipping SMS dispatch");
            return Ok(VerificationDispatch::DevNumber);
        }

        match self.config.provider.as_str() {
            "console" => {
                info!(
                    phone_number = %phone_number,
                    code = %self.config.test_verification_code,
                    "Verification code (console provider)"
                );
                Ok(VerificationDispatch::Console)
            }
            "twilio" => self.send_twilio(phone_number).await,
            provider => {
                error!(provider = %provider, "Unknown SMS provider");
                Err(SmsError::NotConfigured)
            }
        }
    }

    /// Check a verification code for the given (normalized) phone number.
    pub async fn check_verification_code(
        &self,
        phone_number: &str,
        code: &str,
    ) -> Result<(), SmsError> {
        if self.is_test_account(phone_number) {
            return if code == self.config.test_verification_code {
                Ok(())
            } else {
                Err(SmsError::InvalidCode)
            };
        }

        if self.is_dev_number(phone_number) {
            return if code == DEV_NUMBER_CODE {
                Ok(())
            } else {
                Err(SmsError::InvalidCode)
            };
        }

        match self.config.provider.as_str() {
            "console" => {
                if code == self.config.test_verification_code {
                    Ok(())
                } else {
                    Err(SmsError::InvalidCode)
                }
            }
            "twilio" => self.check_twilio(phone_number, code).await,
            provider => {
                error!(provider = %provider, "Unknown SMS provider");
                Err(SmsError::NotConfigured)
            }
        }
    }

    /// Start a verification via the Twilio Verify v2 API.
    async fn send_twilio(&self, phone_number: &str) -> Result<VerificationDispatch, SmsError> {
        let url = format!(
            "https://verify.twilio.com/v2/Services/{}/Verifications",
            self.config.verify_service_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", phone_number), ("Channel", "sms")])
            .send()
            .await?;

        if response.status().is_success() {
            debug!(phone_number = %phone_number, "Verification code sent via Twilio");
            return Ok(VerificationDispatch::Sent);
        }

        Err(map_send_error(response).await)
    }

    /// Check a code via the Twilio Verify v2 API.
    async fn check_twilio(&self, phone_number: &str, code: &str) -> Result<(), SmsError> {
        let url = format!(
            "https://verify.twilio.com/v2/Services/{}/VerificationCheck",
            self.config.verify_service_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", phone_number), ("Code", code)])
            .send()
            .await?;

        if response.status().is_success() {
            let check: TwilioVerificationCheck = response.json().await?;
            return if check.status == "approved" {
                Ok(())
            } else {
                Err(SmsError::InvalidCode)
            };
        }

        Err(map_check_error(response).await)
    }
}

/// Map a failed Twilio Verifications response to an error.
///
/// Twilio codes: 60200 is a malformed number, 60203 is the per-number send
/// limit, 20429 is the general rate limit.
async fn map_send_error(response: reqwest::Response) -> SmsError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: TwilioErrorResponse = serde_json::from_str(&body).unwrap_or_default();

    match parsed.code {
        Some(60200) => SmsError::InvalidNumber,
        Some(60203) | Some(20429) => {
            SmsError::RateLimited("Too many attempts. Please try again later.".to_string())
        }
        _ => SmsError::ProviderError(format!(
            "Twilio returned {}: {}",
            status,
            parsed.message.unwrap_or(body)
        )),
    }
}

/// Map a failed Twilio VerificationCheck response to an error.
///
/// Twilio codes: 60202 is the max-check limit, 20429 is the general rate
/// limit, 20404 means the verification expired or was never started.
async fn map_check_error(response: reqwest::Response) -> SmsError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: TwilioErrorResponse = serde_json::from_str(&body).unwrap_or_default();

    match parsed.code {
        Some(60202) | Some(20429) => {
            SmsError::RateLimited("Too many attempts. Please try again later.".to_string())
        }
        Some(20404) => SmsError::InvalidCode,
        _ => SmsError::ProviderError(format!(
            "Twilio returned {}: {}",
            status,
            parsed.message.unwrap_or(body)
        )),
    }
}
