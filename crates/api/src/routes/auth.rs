//! Phone authentication routes: code dispatch, verification, and account
//! deletion.

use std::time::Duration;

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use domain::models::user::{
    AuthResponse, DeleteAccountResponse, SendCodeRequest, SendCodeResponse, VerifyCodeRequest,
};
use persistence::repositories::UserRepository;
use shared::phone::normalize_phone_number;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::user_auth::create_jwt_config;
use crate::services::AccountDeletionService;

/// Send a verification code to a phone number.
///
/// POST /api/auth/send-code
///
/// Public. Creates the user row on first contact so verification always has
/// an account to land on.
pub async fn send_code(
    State(state): State<AppState>,
    Json(request): Json<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, ApiError> {
    request.validate()?;

    let phone_number = normalize_phone_number(&request.phone_number);
    let users = UserRepository::new(state.pool.clone());
    users.find_or_create_by_phone(&phone_number).await?;

    let dispatch = state.sms.send_verification_code(&phone_number).await?;

    info!(dispatch = dispatch.as_str(), "Verification code dispatched");

    Ok(Json(SendCodeResponse {
        success: true,
        message: "Verification code sent".to_string(),
    }))
}

/// Verify a code and issue a bearer token.
///
/// POST /api/auth/verify-code
///
/// Public. A wrong or expired code comes back as 401.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let phone_number = normalize_phone_number(&request.phone_number);
    state
        .sms
        .check_verification_code(&phone_number, &request.code)
        .await?;

    let users = UserRepository::new(state.pool.clone());
    let user = users.find_or_create_by_phone(&phone_number).await?;

    let jwt_config = create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;
    let token = jwt_config
        .generate_token(user.id)
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))?;

    info!(user_id = %user.id, "User authenticated");

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Delete the authenticated user's account and everything they host.
///
/// DELETE /api/auth/delete-account
///
/// Requires JWT authentication. The cascade runs under a deadline; blowing
/// it returns 504 so clients can retry, since the cascade converges.
pub async fn delete_account(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<DeleteAccountResponse>, ApiError> {
    let service = AccountDeletionService::new(state.pool.clone());
    let deadline = Duration::from_secs(state.config.limits.account_deletion_timeout_secs);

    let summary = match tokio::time::timeout(deadline, service.delete_account(user_auth.user_id))
        .await
    {
        Err(_) => {
            return Err(ApiError::Timeout("Account deletion timed out".to_string()));
        }
        Ok(result) => result?,
    };

    info!(
        user_id = %user_auth.user_id,
        gatherings = summary.gatherings_deleted,
        items = summary.items_deleted,
        "Account deleted"
    );

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: "Account deleted".to_string(),
    }))
}
