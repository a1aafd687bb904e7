//! Email delivery service for feedback notifications.
//!
//! Supports multiple providers:
//! - `console`: Logs emails to the console (development)
//! - `sendgrid`: Sends via the SendGrid v3 API
//!
//! Delivery is fire-and-forget from the caller's point of view; feedback
//! submissions never fail because the notification email did.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info};

use domain::models::FeedbackType;

use crate::config::EmailConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur when sending emails.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// A plain-text email to deliver.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
}

/// Email delivery service.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: Client,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Send an email through the configured provider.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(to = %message.to, "Email sending disabled, skipping");
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                info!(
                    to = %message.to,
                    subject = %message.subject,
                    body = %message.body_text,
                    "Email (console provider)"
                );
                Ok(())
            }
            "sendgrid" => self.send_sendgrid(&message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Notify the feedback inbox about a new submission.
    pub async fn send_feedback_email(
        &self,
        feedback_type: FeedbackType,
        reporter_email: &str,
        message: &str,
    ) -> Result<(), EmailError> {
        let email = EmailMessage {
            to: self.config.feedback_recipient.clone(),
            subject: format!("New {} Submission - Watcha Bringin", feedback_type.label()),
            body_text: format!(
                "Type: {}\nFrom: {}\n\n{}",
                feedback_type.label(),
                reporter_email,
                message
            ),
        };
        self.send(email).await
    }

    async fn send_sendgrid(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let payload = json!({
            "personalizations": [{
                "to": [{ "email": message.to }]
            }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name,
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text,
            }],
        });

        let response = self
            .client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if response.status().is_success() {
            debug!(to = %message.to, "Email sent via SendGrid");
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(EmailError::ProviderError(format!(
            "SendGrid returned {}: {}",
            status, body
        )))
    }
}
