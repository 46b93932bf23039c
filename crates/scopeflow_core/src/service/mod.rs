//! Core use-case services.
//!
//! # Responsibility
//! - Turn UI events into state changes on the review session.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod comment_store;
pub mod theme_service;
