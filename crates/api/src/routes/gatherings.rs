//! Gathering routes: listings, CRUD, and theme updates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::gathering::{
    CreateGatheringRequest, DeleteGatheringResponse, Gathering, PastGatheringsResponse,
    UpcomingGatheringsResponse, UpdateGatheringRequest, UpdateThemeRequest,
};
use persistence::entities::AnimatedBackgroundDb;
use persistence::repositories::{GatheringRepository, GatheringUpdate, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Query parameters for the gathering listing.
#[derive(Debug, Deserialize)]
pub struct ListGatheringsQuery {
    /// `past` for the history view; anything else means upcoming.
    pub range: Option<String>,
}

/// List the user's gatherings.
///
/// GET /api/gatherings?range=
///
/// Requires JWT authentication. The default (upcoming) view splits results
/// into gatherings the user hosts and ones they joined; `range=past` returns
/// a single combined history, most recent first.
pub async fn list_gatherings(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Query(query): Query<ListGatheringsQuery>,
) -> Result<Response, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;

    let repo = GatheringRepository::new(state.pool.clone());
    let today = Utc::now().format("%Y-%m-%d").to_string();

    if query.range.as_deref() == Some("past") {
        let past: Vec<Gathering> = repo
            .list_past(user.id, &user.phone_number, &today)
            .await?
            .into_iter()
            .map(Gathering::from)
            .collect();
        return Ok(Json(PastGatheringsResponse { past }).into_response());
    }

    let created: Vec<Gathering> = repo
        .list_created_upcoming(user.id, &today)
        .await?
        .into_iter()
        .map(Gathering::from)
        .collect();
    let joined: Vec<Gathering> = repo
        .list_joined_upcoming(user.id, &user.phone_number, &today)
        .await?
        .into_iter()
        .map(Gathering::from)
        .collect();

    Ok(Json(UpcomingGatheringsResponse { created, joined }).into_response())
}

/// Create a gathering.
///
/// POST /api/gatherings
///
/// Requires JWT authentication. The caller becomes the host. Inline image
/// payloads are uploaded to the image host before the row is written.
pub async fn create_gathering(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateGatheringRequest>,
) -> Result<(StatusCode, Json<Gathering>), ApiError> {
    request.validate()?;

    let image = match &request.image {
        Some(value) => Some(state.images.store_image(value).await?),
        None => None,
    };
    let cover_image = match &request.cover_image {
        Some(value) => Some(state.images.store_image(value).await?),
        None => None,
    };

    let repo = GatheringRepository::new(state.pool.clone());
    let gathering = repo
        .create(
            &request.name,
            image.as_deref(),
            cover_image.as_deref(),
            request.animated_background.map(AnimatedBackgroundDb::from),
            &request.date,
            &request.time,
            &request.address,
            user_auth.user_id,
        )
        .await?;

    info!(
        gathering_id = %gathering.id,
        host_id = %user_auth.user_id,
        "Gathering created"
    );

    Ok((StatusCode::CREATED, Json(gathering.into())))
}

/// Get a gathering by id.
///
/// GET /api/gatherings/:id
///
/// Requires JWT authentication. Any authenticated user can view a gathering;
/// invite previews cover the unauthenticated case.
pub async fn get_gathering(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Gathering>, ApiError> {
    let repo = GatheringRepository::new(state.pool.clone());
    let gathering = repo
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    Ok(Json(gathering.into()))
}

/// Update a gathering.
///
/// PUT /api/gatherings/:id
///
/// Requires JWT authentication. Host only. Absent fields keep their stored
/// values; `removeCoverImage` clears the cover even when a new one is sent.
pub async fn update_gathering(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGatheringRequest>,
) -> Result<Json<Gathering>, ApiError> {
    request.validate()?;

    let repo = GatheringRepository::new(state.pool.clone());
    let existing = repo
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if existing.host_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can update this gathering".to_string(),
        ));
    }

    let cover_image = match &request.cover_image {
        Some(value) => Some(state.images.store_image(value).await?),
        None => None,
    };

    let update = GatheringUpdate {
        name: request.name,
        image: None,
        cover_image,
        clear_cover_image: request.remove_cover_image.unwrap_or(false),
        animated_background: request.animated_background.map(AnimatedBackgroundDb::from),
        date: request.date,
        time: request.time,
        address: request.address,
    };

    let updated = repo
        .update(id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    info!(gathering_id = %id, "Gathering updated");

    Ok(Json(updated.into()))
}

/// Soft-delete a gathering.
///
/// DELETE /api/gatherings/:id
///
/// Requires JWT authentication. Host only. The row survives, hidden from
/// every read path, until the host's account cascade removes it for good.
pub async fn delete_gathering(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteGatheringResponse>, ApiError> {
    let repo = GatheringRepository::new(state.pool.clone());
    let existing = repo
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if existing.host_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can delete this gathering".to_string(),
        ));
    }

    repo.soft_delete(id).await?;

    info!(gathering_id = %id, host_id = %user_auth.user_id, "Gathering deleted");

    Ok(Json(DeleteGatheringResponse { success: true }))
}

/// Update a gathering's visual theme.
///
/// PUT /api/gatherings/:id/theme
///
/// Requires JWT authentication. Host only. Touches only the cover image and
/// animated background, leaving the rest of the gathering alone.
pub async fn update_theme(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateThemeRequest>,
) -> Result<Json<Gathering>, ApiError> {
    request.validate()?;

    let repo = GatheringRepository::new(state.pool.clone());
    let existing = repo
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if existing.host_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can update the theme".to_string(),
        ));
    }

    let cover_image = match &request.cover_image {
        Some(value) => Some(state.images.store_image(value).await?),
        None => None,
    };

    let update = GatheringUpdate {
        cover_image,
        clear_cover_image: request.remove_cover_image.unwrap_or(false),
        animated_background: request.animated_background.map(AnimatedBackgroundDb::from),
        ..Default::default()
    };

    let updated = repo
        .update(id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    info!(gathering_id = %id, "Gathering theme updated");

    Ok(Json(updated.into()))
}
