//! Core review-session logic for ScopeFlow.
//! Owns comment threads, their persistence, and the viewer seams.

pub mod db;
pub mod document;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use document::navigation::{
    page_anchor_id, parse_page_anchor, LastTargetNavigator, NoopNavigator, PageNavigator,
};
pub use document::session::{DocumentError, DocumentSession, DocumentSource};
pub use document::viewport::{PageLayout, PageSize};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::comment::{
    validate_threads, Author, Comment, CommentId, CommentSource, CommentValidationError,
    Highlight, HighlightRect, Reaction,
};
pub use model::seed::{requester, reviewer, seed_comments, OutlineEntry, DOCUMENT_OUTLINE};
pub use repo::kv_repo::{KvStore, MemoryKvStore, RepoError, RepoResult, SqliteKvStore};
pub use repo::snapshot_repo::{CommentSnapshotStore, KvSnapshotStore, COMMENTS_STORAGE_KEY};
pub use service::comment_store::{ChangeHook, CommentStore, MutationOutcome, ThreadSummary};
pub use service::theme_service::{Theme, ThemeService, THEME_STORAGE_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
