//! Public feedback form route.
//!
//! Submissions are stored first, then fanned out: a notification email goes
//! to the feedback inbox, and bugs and feature requests open a tracker
//! issue. The fan-out runs on detached tasks so slow providers never hold up
//! the response.

use axum::{extract::State, http::HeaderMap, Json};
use tracing::{info, warn};

use domain::models::feedback::{
    build_issue_body, build_issue_title, issue_labels, CreateFeedbackRequest, FeedbackResponse,
    FeedbackType,
};
use persistence::repositories::FeedbackRepository;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Submit feedback from the public support form.
///
/// POST /api/feedback
///
/// Public, permissive CORS. Guarded by reCAPTCHA instead of authentication.
pub async fn submit_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    request.validate()?;

    if !state.recaptcha.verify(&request.recaptcha_token).await {
        return Err(ApiError::BadRequest(
            "reCAPTCHA verification failed. Please try again.".to_string(),
        ));
    }

    let ip_address = client_ip(&headers);
    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let feedback_type = request.feedback_type.unwrap_or(FeedbackType::Other);

    let repo = FeedbackRepository::new(state.pool.clone());
    let feedback = repo
        .insert(
            &request.email,
            &request.message,
            feedback_type.into(),
            ip_address.as_deref(),
            user_agent.as_deref(),
        )
        .await?;

    info!(
        feedback_id = %feedback.id,
        feedback_type = %feedback_type,
        "Feedback stored"
    );

    let email_service = state.email.clone();
    let reporter_email = request.email.clone();
    let email_message = request.message.clone();
    tokio::spawn(async move {
        if let Err(e) = email_service
            .send_feedback_email(feedback_type, &reporter_email, &email_message)
            .await
        {
            warn!(error = %e, "Failed to send feedback notification email");
        }
    });

    if feedback_type.opens_issue() && state.github.is_configured() {
        let github = state.github.clone();
        let title = build_issue_title(&request.message, feedback_type.issue_prefix());
        let body = build_issue_body(&request.message, &request.email, feedback_type);
        let labels = issue_labels(feedback_type);
        tokio::spawn(async move {
            match github.create_issue(&title, &body, &labels).await {
                Ok(issue) => {
                    info!(issue = issue.number, url = %issue.html_url, "Opened tracker issue")
                }
                Err(e) => warn!(error = %e, "Failed to open tracker issue"),
            }
        });
    }

    Ok(Json(FeedbackResponse {
        success: true,
        message: "Thank you for your feedback!".to_string(),
        id: feedback.id,
    }))
}

/// Best-effort client address: first hop of `X-Forwarded-For`, then
/// `X-Real-IP`, else nothing.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.1"));
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.1"));
        assert_eq!(client_ip(&headers).as_deref(), Some("192.0.2.1"));
    }

    #[test]
    fn test_client_ip_absent() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
    }

    #[test]
    fn test_client_ip_ignores_empty_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.1"));
        assert_eq!(client_ip(&headers).as_deref(), Some("192.0.2.1"));
    }
}
