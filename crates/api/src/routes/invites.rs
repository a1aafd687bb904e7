//! Invite routes: shareable codes, public previews, and joining.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::invite::{
    generate_invite_code, share_link, share_message, GatheringPreview, InvitePreview,
    InvitePreviewResponse, InviteResponse, JoinGatheringResponse, JoinedGathering,
};
use persistence::repositories::{GatheringRepository, InviteRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Fetch or lazily create a gathering's invite.
///
/// GET /api/gatherings/:id/invite
/// POST /api/gatherings/:id/invite
///
/// Requires JWT authentication. Host only. A gathering has one invite; the
/// first call mints it and later calls return the same code.
pub async fn get_or_create_invite(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<InviteResponse>, ApiError> {
    let gatherings = GatheringRepository::new(state.pool.clone());
    let gathering = gatherings
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if gathering.host_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can generate invites".to_string(),
        ));
    }

    let invites = InviteRepository::new(state.pool.clone());
    let invite = match invites.find_by_gathering(id).await? {
        Some(existing) => existing,
        None => {
            let code = invites.generate_unique_code(generate_invite_code).await?;
            let created = invites.create(id, &code).await?;
            info!(gathering_id = %id, code = %created.code, "Invite created");
            created
        }
    };

    let link = share_link(&state.config.server.app_base_url, &invite.code);
    let message = share_message(
        &gathering.name,
        &gathering.date,
        &gathering.time,
        &gathering.address,
        &invite.code,
        &link,
    );

    Ok(Json(InviteResponse {
        success: true,
        code: invite.code,
        link,
        message,
    }))
}

/// Preview the gathering behind an invite code.
///
/// GET /api/invites/:code
///
/// Public, permissive CORS: the share link lands here before the viewer has
/// an account. No host id in the response.
pub async fn preview_invite(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<InvitePreviewResponse>, ApiError> {
    let invites = InviteRepository::new(state.pool.clone());
    let invite = invites
        .find_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite code not found".to_string()))?;

    let gatherings = GatheringRepository::new(state.pool.clone());
    let gathering = gatherings
        .find_active_by_id(invite.gathering_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    Ok(Json(InvitePreviewResponse {
        gathering: GatheringPreview {
            id: gathering.id,
            name: gathering.name,
            image: gathering.image,
            date: gathering.date,
            time: gathering.time,
            address: gathering.address,
        },
        invite: InvitePreview {
            code: invite.code,
            status: invite.status.into(),
        },
    }))
}

/// Join a gathering through an invite code.
///
/// POST /api/invites/:code/join
///
/// Requires JWT authentication. Joining is idempotent; the accepted-user set
/// keeps one membership no matter how many times the code is redeemed.
pub async fn join_gathering(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(code): Path<String>,
) -> Result<Json<JoinGatheringResponse>, ApiError> {
    let invites = InviteRepository::new(state.pool.clone());
    let invite = invites
        .find_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite code not found".to_string()))?;

    let gatherings = GatheringRepository::new(state.pool.clone());
    let gathering = gatherings
        .find_active_by_id(invite.gathering_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if gathering.host_id == user_auth.user_id {
        return Err(ApiError::BadRequest(
            "You are already the host of this gathering".to_string(),
        ));
    }

    invites.mark_accepted(invite.id).await?;
    let added = invites
        .add_accepted_user(invite.id, user_auth.user_id)
        .await?;

    if added > 0 {
        info!(
            gathering_id = %gathering.id,
            user_id = %user_auth.user_id,
            "User joined gathering"
        );
    }

    Ok(Json(JoinGatheringResponse {
        success: true,
        gathering: JoinedGathering {
            id: gathering.id,
            name: gathering.name,
            image: gathering.image,
            date: gathering.date,
            time: gathering.time,
            address: gathering.address,
            host_id: gathering.host_id,
        },
    }))
}
