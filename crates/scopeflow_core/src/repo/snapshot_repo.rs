//! Comment snapshot persistence over local storage.
//!
//! # Responsibility
//! - Serialize the full thread collection under one storage key.
//! - Reject snapshots that are not a valid, non-empty thread list.
//!
//! # Invariants
//! - Read paths report malformed data as `RepoError::InvalidData`; deciding
//!   on a fallback is the caller's job.
//! - The snapshot carries no schema version; shape drift fails validation.

use crate::model::comment::{validate_threads, Comment};
use crate::repo::kv_repo::{KvStore, RepoError, RepoResult};

/// Storage key of the serialized thread collection.
pub const COMMENTS_STORAGE_KEY: &str = "scopeflow-comments";

/// Persistence port used by the comment store.
pub trait CommentSnapshotStore {
    /// Returns `Ok(None)` when nothing usable has been saved yet.
    fn load_snapshot(&self) -> RepoResult<Option<Vec<Comment>>>;
    fn save_snapshot(&self, threads: &[Comment]) -> RepoResult<()>;
}

impl<P: CommentSnapshotStore + ?Sized> CommentSnapshotStore for &P {
    fn load_snapshot(&self) -> RepoResult<Option<Vec<Comment>>> {
        (**self).load_snapshot()
    }

    fn save_snapshot(&self, threads: &[Comment]) -> RepoResult<()> {
        (**self).save_snapshot(threads)
    }
}

/// JSON snapshot adapter on top of any [`KvStore`].
pub struct KvSnapshotStore<S: KvStore> {
    kv: S,
    key: String,
}

impl<S: KvStore> KvSnapshotStore<S> {
    /// Uses the default [`COMMENTS_STORAGE_KEY`].
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, COMMENTS_STORAGE_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Drops the stored snapshot so the next load falls back to seed data.
    pub fn clear(&self) -> RepoResult<()> {
        self.kv.remove_item(&self.key)
    }
}

impl<S: KvStore> CommentSnapshotStore for KvSnapshotStore<S> {
    fn load_snapshot(&self) -> RepoResult<Option<Vec<Comment>>> {
        let Some(raw) = self.kv.get_item(&self.key)? else {
            return Ok(None);
        };

        let threads: Vec<Comment> = serde_json::from_str(&raw).map_err(|err| {
            RepoError::InvalidData(format!("snapshot `{}` is not a thread list: {err}", self.key))
        })?;
        if threads.is_empty() {
            return Ok(None);
        }
        validate_threads(&threads).map_err(|err| {
            RepoError::InvalidData(format!("snapshot `{}` violates invariants: {err}", self.key))
        })?;

        Ok(Some(threads))
    }

    fn save_snapshot(&self, threads: &[Comment]) -> RepoResult<()> {
        let raw = serde_json::to_string(threads)
            .map_err(|err| RepoError::InvalidData(format!("snapshot encode failed: {err}")))?;
        self.kv.set_item(&self.key, &raw)
    }
}
