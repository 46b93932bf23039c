//! Domain model for review threads.
//!
//! # Responsibility
//! - Define the comment/reply record and its document anchor.
//! - Ship the fixed identities and seed data of the review session.
//!
//! # Invariants
//! - Every comment is identified by a stable, collection-unique id.
//! - Deletion removes a whole thread; there are no tombstones.

pub mod comment;
pub mod seed;
