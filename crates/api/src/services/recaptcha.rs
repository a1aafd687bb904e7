//! reCAPTCHA v3 verification for the public feedback form.
//!
//! Verification is advisory: when the secret is not configured the service
//! allows every request, and transport failures are logged but do not block
//! the submission. The literal token `dev-token` always passes, so local
//! clients can exercise the form without a reCAPTCHA widget.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::RecaptchaConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Token accepted unconditionally for local development.
const DEV_TOKEN: &str = "dev-token";

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    score: Option<f32>,
    #[serde(rename = "error-codes")]
    error_codes: Option<Vec<String>>,
}

/// reCAPTCHA verification service.
#[derive(Clone)]
pub struct RecaptchaService {
    config: Arc<RecaptchaConfig>,
    client: Client,
}

impl RecaptchaService {
    /// Creates a new RecaptchaService with the given configuration.
    pub fn new(config: RecaptchaConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Verify a client token, returning whether the request should proceed.
    pub async fn verify(&self, token: &str) -> bool {
        if token == DEV_TOKEN {
            debug!("Accepting development reCAPTCHA token");
            return true;
        }

        if self.config.secret_key.is_empty() {
            warn!("reCAPTCHA secret not configured, allowing request");
            return true;
        }

        let response = self
            .client
            .post(SITEVERIFY_URL)
            .form(&[
                ("secret", self.config.secret_key.as_str()),
                ("response", token),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "reCAPTCHA verification request failed, rejecting");
                return false;
            }
        };

        let result: SiteverifyResponse = match response.json().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Failed to parse reCAPTCHA response, rejecting");
                return false;
            }
        };

        if !result.success {
            debug!(errors = ?result.error_codes, "reCAPTCHA rejected token");
            return false;
        }

        let score = result.score.unwrap_or(0.0);
        if score < self.config.min_score {
            debug!(score = score, min = self.config.min_score, "reCAPTCHA score below threshold");
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dev_token_always_passes() {
        let service = RecaptchaService::new(RecaptchaConfig {
            secret_key: "some-secret".to_string(),
            min_score: 0.5,
        });
        assert!(service.verify("dev-token").await);
    }

    #[tokio::test]
    async fn test_unconfigured_secret_allows_requests() {
        let service = RecaptchaService::new(RecaptchaConfig {
            secret_key: String::new(),
            min_score: 0.5,
        });
        assert!(service.verify("any-client-token").await);
    }

    #[test]
    fn test_siteverify_response_parses_error_codes() {
        let json = r#"{"success": false, "error-codes": ["invalid-input-response"]}"#;
        let parsed: SiteverifyResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert_eq!(
            parsed.error_codes.unwrap(),
            vec!["invalid-input-response".to_string()]
        );
        assert!(parsed.score.is_none());
    }

    #[test]
    fn test_siteverify_response_parses_score() {
        let json = r#"{"success": true, "score": 0.9, "action": "feedback"}"#;
        let parsed: SiteverifyResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.score, Some(0.9));
    }
}
