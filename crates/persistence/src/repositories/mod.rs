//! Repository implementations for database operations.

pub mod feedback;
pub mod gathering;
pub mod invite;
pub mod item;
pub mod user;

pub use feedback::FeedbackRepository;
pub use gathering::{GatheringRepository, GatheringUpdate};
pub use invite::InviteRepository;
pub use item::ItemRepository;
pub use user::UserRepository;
