//! Seams to the external document viewer.
//!
//! # Responsibility
//! - Track document load outcome and page count.
//! - Compute page geometry handed to the host renderer.
//! - Define how the core asks the host to scroll.

pub mod navigation;
pub mod session;
pub mod viewport;
