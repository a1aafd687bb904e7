//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod feedback;
pub mod gathering;
pub mod invite;
pub mod item;
pub mod user;

pub use feedback::{FeedbackEntity, FeedbackTypeDb};
pub use gathering::{AnimatedBackgroundDb, GatheringEntity};
pub use invite::{InviteEntity, InviteStatusDb};
pub use item::{ItemEntity, ItemTypeDb};
pub use user::UserEntity;
