//! Gateway Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod health;
pub mod pages;
