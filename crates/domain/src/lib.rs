//! Domain layer for the Watcha Bringin backend.
//!
//! This crate contains:
//! - Domain models (User, Gathering, Item, Invite, Feedback)
//! - Request/response DTOs with validation
//! - Pure domain logic (invite codes, share messages, issue titles)

pub mod models;
