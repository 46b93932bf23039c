//! Repository layer: local storage ports and snapshot persistence.
//!
//! # Responsibility
//! - Define the key-value storage contract the review core persists through.
//! - Isolate SQLite and JSON details from the comment store.
//!
//! # Invariants
//! - Repository APIs report failures as `RepoError`; swallowing them is a
//!   service-layer decision.

pub mod kv_repo;
pub mod snapshot_repo;
