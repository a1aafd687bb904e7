//! Domain models for Watcha Bringin.

pub mod feedback;
pub mod gathering;
pub mod invite;
pub mod item;
pub mod user;

pub use feedback::{Feedback, FeedbackType};
pub use gathering::{AnimatedBackground, Gathering};
pub use invite::{Invite, InviteStatus};
pub use item::{Item, ItemType};
pub use user::User;
