//! External service integrations.

pub mod account_deletion;
pub mod email;
pub mod github;
pub mod images;
pub mod recaptcha;
pub mod sms;

pub use account_deletion::{AccountDeletionService, DeletionSummary};
pub use email::EmailService;
pub use github::GithubService;
pub use images::ImageService;
pub use recaptcha::RecaptchaService;
pub use sms::SmsService;
