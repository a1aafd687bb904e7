//! User JWT authentication middleware.
//!
//! Provides middleware for requiring JWT-based user authentication on routes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use shared::jwt::{self, JwtConfig};

/// Authenticated user information extracted from JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
}

impl UserAuth {
    /// Validates a bearer token and returns user authentication info.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            jwt::extract_user_id(&claims).map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(UserAuth { user_id })
    }
}

/// Creates a JwtConfig from the application's JWT settings.
pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
    JwtConfig::with_leeway(&config.secret, config.token_expiry_secs, config.leeway_secs)
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
}

/// Middleware that requires JWT user authentication.
///
/// This middleware validates the Bearer token in the Authorization header
/// and rejects requests without a valid JWT. Authenticated user information
/// is stored in request extensions for use by downstream handlers.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    // Create JWT config
    let jwt_config = match create_jwt_config(&state.config.jwt) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to create JWT config: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    // Validate the token
    match UserAuth::validate(&jwt_config, token) {
        Ok(auth) => {
            // Store authentication info in request extensions
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create internal error response.
fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt_auth_config() -> JwtAuthConfig {
        JwtAuthConfig {
            secret: "test_secret_key_for_user_auth_12345".to_string(),
            token_expiry_secs: 3600,
            leeway_secs: 30,
        }
    }

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Missing or invalid Authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_response() {
        let response = internal_error_response("Authentication service unavailable");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_create_jwt_config() {
        assert!(create_jwt_config(&test_jwt_auth_config()).is_ok());
    }

    #[test]
    fn test_create_jwt_config_empty_secret_fails() {
        let config = JwtAuthConfig {
            secret: String::new(),
            token_expiry_secs: 3600,
            leeway_secs: 30,
        };
        assert!(create_jwt_config(&config).is_err());
    }

    #[test]
    fn test_validate_round_trip() {
        let jwt_config = create_jwt_config(&test_jwt_auth_config()).unwrap();
        let user_id = Uuid::new_v4();
        let token = jwt_config.generate_token(user_id).unwrap();

        let auth = UserAuth::validate(&jwt_config, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
    }

    #[test]
    fn test_validate_rejects_garbage_token() {
        let jwt_config = create_jwt_config(&test_jwt_auth_config()).unwrap();
        assert!(UserAuth::validate(&jwt_config, "not-a-token").is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let jwt_config = create_jwt_config(&test_jwt_auth_config()).unwrap();
        let token = jwt_config.generate_token(Uuid::new_v4()).unwrap();

        let other = JwtAuthConfig {
            secret: "another_secret_entirely_67890".to_string(),
            token_expiry_secs: 3600,
            leeway_secs: 30,
        };
        let other_config = create_jwt_config(&other).unwrap();
        assert!(UserAuth::validate(&other_config, &token).is_err());
    }
}
