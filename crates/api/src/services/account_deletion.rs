//! Account deletion cascade.
//!
//! Removes a user and everything they host: items on hosted gatherings, the
//! user's claims elsewhere, invite memberships, the hosted gatherings
//! themselves, and finally the user row. The cascade is idempotent; running
//! it again after a partial failure converges, and a second complete run
//! reports the account as not found.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use persistence::repositories::{
    GatheringRepository, InviteRepository, ItemRepository, UserRepository,
};

/// Errors that can occur during the deletion cascade.
#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("Account not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Row counts from a completed cascade, for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionSummary {
    pub gatherings_deleted: u64,
    pub items_deleted: u64,
    pub items_unclaimed: u64,
    pub memberships_removed: u64,
}

/// Orchestrates the account deletion cascade across repositories.
#[derive(Clone)]
pub struct AccountDeletionService {
    users: UserRepository,
    gatherings: GatheringRepository,
    items: ItemRepository,
    invites: InviteRepository,
}

impl AccountDeletionService {
    /// Creates a new AccountDeletionService over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            gatherings: GatheringRepository::new(pool.clone()),
            items: ItemRepository::new(pool.clone()),
            invites: InviteRepository::new(pool),
        }
    }

    /// Run the full cascade for a user.
    ///
    /// Phases: resolve hosted gathering ids, then in parallel delete their
    /// items, release the user's claims, and drop invite memberships; then
    /// hard-delete the hosted gatherings and the user row. Soft-deleted
    /// gatherings are swept up too. A zero-row user delete means the account
    /// was already gone.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<DeletionSummary, DeletionError> {
        let gathering_ids = self.gatherings.list_ids_by_host(user_id).await?;

        let (items_deleted, items_unclaimed, memberships_removed) = tokio::try_join!(
            self.items.delete_by_gatherings(&gathering_ids),
            self.items.unclaim_all_for_user(user_id),
            self.invites.remove_user_from_all(user_id),
        )?;

        let gatherings_deleted = self.gatherings.delete_by_host(user_id).await?;

        let users_deleted = self.users.delete_by_id(user_id).await?;
        if users_deleted == 0 {
            return Err(DeletionError::NotFound);
        }

        let summary = DeletionSummary {
            gatherings_deleted,
            items_deleted,
            items_unclaimed,
            memberships_removed,
        };

        persistence::metrics::record_account_deletion(
            summary.gatherings_deleted,
            summary.items_deleted,
            summary.items_unclaimed,
            summary.memberships_removed,
        );
        info!(
            user_id = %user_id,
            gatherings = summary.gatherings_deleted,
            items = summary.items_deleted,
            unclaimed = summary.items_unclaimed,
            memberships = summary.memberships_removed,
            "Account deletion cascade completed"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    // Note: AccountDeletionService tests require database connection and are
    // covered by integration tests
}
