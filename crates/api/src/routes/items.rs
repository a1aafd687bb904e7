//! Item routes: the food and drink list on a gathering, and the claim toggle.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::item::{ClaimItemRequest, CreateItemRequest, DeleteItemResponse, Item};
use persistence::repositories::{GatheringRepository, ItemRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// List a gathering's items.
///
/// GET /api/gatherings/:id/items
///
/// Requires JWT authentication. Items come back in creation order.
pub async fn list_items(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let gatherings = GatheringRepository::new(state.pool.clone());
    gatherings
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    let items = ItemRepository::new(state.pool.clone());
    let items: Vec<Item> = items
        .list_by_gathering(id)
        .await?
        .into_iter()
        .map(Item::from)
        .collect();

    Ok(Json(items))
}

/// Add an item to a gathering.
///
/// POST /api/gatherings/:id/items
///
/// Requires JWT authentication. Host only.
pub async fn create_item(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    request.validate()?;

    let gatherings = GatheringRepository::new(state.pool.clone());
    let gathering = gatherings
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if gathering.host_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can add items".to_string(),
        ));
    }

    let items = ItemRepository::new(state.pool.clone());
    let item = items
        .create(id, &request.name, request.item_type.into())
        .await?;

    info!(item_id = %item.id, gathering_id = %id, "Item created");

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Remove an item from a gathering.
///
/// DELETE /api/gatherings/:id/items/:item_id
///
/// Requires JWT authentication. Host only. The delete is scoped to the
/// gathering in the path, so a stale or foreign item id is a 404.
pub async fn delete_item(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeleteItemResponse>, ApiError> {
    let gatherings = GatheringRepository::new(state.pool.clone());
    let gathering = gatherings
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if gathering.host_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can delete items".to_string(),
        ));
    }

    let items = ItemRepository::new(state.pool.clone());
    let removed = items.delete_scoped(item_id, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    info!(item_id = %item_id, gathering_id = %id, "Item deleted");

    Ok(Json(DeleteItemResponse { success: true }))
}

/// Claim or release an item.
///
/// POST /api/gatherings/:id/claim-item
///
/// Requires JWT authentication. Toggles: a caller who holds the claim
/// releases it, anyone else claims. Claims are conditional updates, so a
/// losing race responds 409 instead of silently overwriting.
pub async fn claim_item(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<ClaimItemRequest>,
) -> Result<Json<Item>, ApiError> {
    request.validate()?;

    let items = ItemRepository::new(state.pool.clone());
    let item = items
        .find_by_id(request.item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    // Item ids are global; an id from another gathering is not visible here
    if item.gathering_id != id {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    let gatherings = GatheringRepository::new(state.pool.clone());
    gatherings
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gathering not found".to_string()))?;

    if item.claimed_by == Some(user_auth.user_id) {
        let released = items
            .unclaim(item.id, user_auth.user_id)
            .await?
            .ok_or_else(|| {
                ApiError::Conflict("This item has already been claimed".to_string())
            })?;

        info!(item_id = %item.id, user_id = %user_auth.user_id, "Item claim released");

        return Ok(Json(released.into()));
    }

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;

    let provided_name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let claim_name = match provided_name.clone().or(user.name.clone()) {
        Some(name) => name,
        None => {
            return Err(ApiError::BadRequest(
                "Name is required to claim an item".to_string(),
            ));
        }
    };

    // First claim under a display name fills in the empty profile
    if user.name.is_none() {
        if let Some(ref name) = provided_name {
            users.update_name(user.id, name).await?;
        }
    }

    let claimed = items
        .claim(
            item.id,
            user_auth.user_id,
            &claim_name,
            request.custom_description.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::Conflict("This item has already been claimed".to_string()))?;

    info!(item_id = %item.id, user_id = %user_auth.user_id, "Item claimed");

    Ok(Json(claimed.into()))
}
