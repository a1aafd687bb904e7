use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware, trace_id,
};
use crate::routes::{auth, feedback, gatherings, health, invites, items};
use crate::services::{EmailService, GithubService, ImageService, RecaptchaService, SmsService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub sms: SmsService,
    pub images: ImageService,
    pub email: EmailService,
    pub recaptcha: RecaptchaService,
    pub github: GithubService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        sms: SmsService::new(config.sms.clone()),
        images: ImageService::new(config.images.clone()),
        email: EmailService::new(config.email.clone()),
        recaptcha: RecaptchaService::new(config.recaptcha.clone()),
        github: GithubService::new(config.github.clone()),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a bearer token)
    let protected_routes = Router::new()
        .route("/api/auth/delete-account", delete(auth::delete_account))
        .route(
            "/api/gatherings",
            get(gatherings::list_gatherings).post(gatherings::create_gathering),
        )
        .route(
            "/api/gatherings/:id",
            get(gatherings::get_gathering)
                .put(gatherings::update_gathering)
                .delete(gatherings::delete_gathering),
        )
        .route("/api/gatherings/:id/theme", put(gatherings::update_theme))
        .route(
            "/api/gatherings/:id/items",
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/api/gatherings/:id/items/:item_id",
            delete(items::delete_item),
        )
        .route("/api/gatherings/:id/claim-item", post(items::claim_item))
        .route(
            "/api/gatherings/:id/invite",
            get(invites::get_or_create_invite).post(invites::get_or_create_invite),
        )
        .route("/api/invites/:code/join", post(invites::join_gathering))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/send-code", post(auth::send_code))
        .route("/api/auth/verify-code", post(auth::verify_code))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors);

    // The invite preview and feedback form are fetched from share links and
    // the marketing site, so they keep permissive CORS even in production
    let open_routes = Router::new()
        .route("/api/invites/:code", get(invites::preview_invite))
        .route("/api/feedback", post(feedback::submit_feedback))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Merge all routes
    Router::new()
        .merge(api_routes)
        .merge(open_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .with_state(state)
}
