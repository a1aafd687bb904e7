//! Image hosting service for gathering photos.
//!
//! Supports multiple providers:
//! - `console`: Returns a deterministic placeholder URL (development)
//! - `cloudinary`: Signed uploads to the Cloudinary upload API
//!
//! Clients send new images inline as base64 data URIs; values that are
//! already http(s) URLs pass through untouched.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::ImagesConfig;

const UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur during image uploads.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Image service not configured")]
    NotConfigured,
}

/// Cloudinary upload response; `secure_url` is the hosted image.
#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorResponse {
    error: CloudinaryErrorDetails,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorDetails {
    message: String,
}

/// Image hosting service.
#[derive(Clone)]
pub struct ImageService {
    config: Arc<ImagesConfig>,
    client: Client,
}

impl ImageService {
    /// Creates a new ImageService with the given configuration.
    pub fn new(config: ImagesConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Store an image value, returning the hosted URL.
    ///
    /// Data URIs are uploaded through the configured provider; anything else
    /// is assumed to already be a hosted URL and is returned as-is.
    pub async fn store_image(&self, value: &str) -> Result<String, ImageError> {
        if !value.starts_with("data:") {
            return Ok(value.to_string());
        }

        match self.config.provider.as_str() {
            "console" => {
                let url = placeholder_url(&self.config.upload_folder, value);
                info!(url = %url, "Image stored (console provider)");
                Ok(url)
            }
            "cloudinary" => self.upload_cloudinary(value).await,
            provider => {
                error!(provider = %provider, "Unknown image provider");
                Err(ImageError::NotConfigured)
            }
        }
    }

    /// Signed upload to Cloudinary. The data URI goes straight into the
    /// `file` form field; Cloudinary decodes it server-side.
    async fn upload_cloudinary(&self, data_uri: &str) -> Result<String, ImageError> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        );

        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign_upload(
            &self.config.upload_folder,
            timestamp,
            &self.config.api_secret,
        );
        let timestamp_str = timestamp.to_string();

        let response = self
            .client
            .post(&url)
            .form(&[
                ("file", data_uri),
                ("folder", self.config.upload_folder.as_str()),
                ("timestamp", timestamp_str.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            let upload: CloudinaryUploadResponse = response.json().await?;
            debug!(url = %upload.secure_url, "Image uploaded to Cloudinary");
            return Ok(upload.secure_url);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<CloudinaryErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        Err(ImageError::ProviderError(format!(
            "Cloudinary returned {}: {}",
            status, message
        )))
    }
}

/// Cloudinary request signature: SHA-256 over the alphabetically ordered
/// params (`file`, `api_key`, and `signature` itself excluded) with the API
/// secret appended.
fn sign_upload(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let to_sign = format!("folder={}&timestamp={}{}", folder, timestamp, api_secret);
    hex::encode(Sha256::digest(to_sign.as_bytes()))
}

/// Deterministic placeholder URL for the console provider, derived from the
/// payload so repeated uploads of the same image agree.
fn placeholder_url(folder: &str, data: &str) -> String {
    let digest = hex::encode(Sha256::digest(data.as_bytes()));
    format!("https://images.invalid/{}/{}.jpg", folder, &digest[..20])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ImagesConfig {
        ImagesConfig {
            provider: "console".to_string(),
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            upload_folder: "whatcha-bringin".to_string(),
        }
    }

    #[tokio::test]
    async fn test_http_urls_pass_through() {
        let service = ImageService::new(test_config());
        let url = "https://images.example.com/existing.jpg";
        assert_eq!(service.store_image(url).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_console_upload_is_deterministic() {
        let service = ImageService::new(test_config());
        let data_uri = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

        let first = service.store_image(data_uri).await.unwrap();
        let second = service.store_image(data_uri).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("https://images.invalid/whatcha-bringin/"));
        assert!(first.ends_with(".jpg"));

        let other = service
            .store_image("data:image/png;base64,AAAA")
            .await
            .unwrap();
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn test_unknown_provider_errors() {
        let mut config = test_config();
        config.provider = "imgur".to_string();
        let service = ImageService::new(config);

        let result = service.store_image("data:image/png;base64,AAAA").await;
        assert!(matches!(result, Err(ImageError::NotConfigured)));
    }

    #[test]
    fn test_sign_upload_shape() {
        let signature = sign_upload("whatcha-bringin", 1_700_000_000, "secret");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));

        // Same inputs agree, a different secret does not
        assert_eq!(
            signature,
            sign_upload("whatcha-bringin", 1_700_000_000, "secret")
        );
        assert_ne!(
            signature,
            sign_upload("whatcha-bringin", 1_700_000_000, "other")
        );
    }

    #[test]
    fn test_placeholder_url_uses_folder() {
        let url = placeholder_url("test-folder", "data:image/png;base64,AAAA");
        assert!(url.starts_with("https://images.invalid/test-folder/"));
    }
}
