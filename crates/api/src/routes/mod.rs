//! HTTP route handlers.

pub mod auth;
pub mod feedback;
pub mod gatherings;
pub mod health;
pub mod invites;
pub mod items;
