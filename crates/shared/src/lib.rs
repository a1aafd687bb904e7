//! Shared utilities and common types for the Watcha Bringin backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT issuing and validation for bearer auth
//! - Phone number normalization
//! - Common validation logic

pub mod jwt;
pub mod phone;
pub mod validation;
