//! FFI use-case API for the Flutter review screen.
//!
//! # Responsibility
//! - Expose comment-thread and theme operations to Dart via FRB.
//! - Hold one process-wide review session backed by SQLite local storage.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Unknown ids are reported through `found = false`, never as failures.
//! - `ok = false` only for storage bootstrap or input decoding problems.

use log::warn;
use scopeflow_core::db::open_db;
use scopeflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CommentStore, Highlight, KvSnapshotStore, LastTargetNavigator, MutationOutcome,
    SqliteKvStore, ThemeService, ThreadSummary,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const REVIEW_DB_FILE_NAME: &str = "scopeflow_review.sqlite3";
static REVIEW_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<ReviewSession>> = Mutex::new(None);

struct ReviewSession {
    comments: CommentStore<KvSnapshotStore<SqliteKvStore>>,
    theme: Option<ThemeService<SqliteKvStore>>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Thread row for the side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewThreadItem {
    pub comment_id: String,
    pub author_name: String,
    pub snippet: String,
    pub reply_count: u32,
    pub resolved: bool,
    /// `None` for standalone threads.
    pub page_number: Option<u32>,
}

/// Result envelope for comment mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewActionResponse {
    /// Whether the call reached the store.
    pub ok: bool,
    /// Whether the targeted thread/reply existed.
    pub found: bool,
    /// Id created by the call, if any.
    pub comment_id: Option<String>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl ReviewActionResponse {
    fn created(message: impl Into<String>, comment_id: String) -> Self {
        Self {
            ok: true,
            found: true,
            comment_id: Some(comment_id),
            message: message.into(),
        }
    }

    fn outcome(outcome: MutationOutcome, message: impl Into<String>) -> Self {
        let found = outcome.is_applied();
        Self {
            ok: true,
            found,
            comment_id: None,
            message: if found {
                message.into()
            } else {
                "No matching comment.".to_string()
            },
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            found: false,
            comment_id: None,
            message: message.into(),
        }
    }
}

/// Full thread collection as the persisted JSON array.
///
/// # FFI contract
/// - Returns `[]` when the session cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn review_threads_json() -> String {
    with_session(|session| serde_json::to_string(session.comments.comments()))
        .ok()
        .and_then(|encoded| encoded.ok())
        .unwrap_or_else(|| "[]".to_string())
}

/// Thread rows in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn review_list_threads() -> Vec<ReviewThreadItem> {
    with_session(|session| {
        session
            .comments
            .thread_summaries()
            .into_iter()
            .map(to_thread_item)
            .collect()
    })
    .unwrap_or_default()
}

/// Adds a root comment; `highlight_json` anchors it to the document.
///
/// # FFI contract
/// - `highlight_json` uses the persisted highlight shape
///   (`pageNumber`, `text`, `pinX`, `pinY`, `rects`).
/// - Returns `ok = false` when `highlight_json` cannot be decoded.
#[flutter_rust_bridge::frb(sync)]
pub fn review_add_comment(body: String, highlight_json: Option<String>) -> ReviewActionResponse {
    let highlight = match highlight_json.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match serde_json::from_str::<Highlight>(raw) {
            Ok(highlight) => Some(highlight),
            Err(err) => {
                return ReviewActionResponse::failure(format!("invalid highlight: {err}"));
            }
        },
    };

    match with_session(|session| session.comments.add_comment(body.trim(), highlight)) {
        Ok(id) => ReviewActionResponse::created("Comment added.", id),
        Err(err) => ReviewActionResponse::failure(format!("review_add_comment failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_add_reply(comment_id: String, body: String) -> ReviewActionResponse {
    match with_session(|session| session.comments.add_reply(&comment_id, body.trim())) {
        Ok(Some(reply_id)) => ReviewActionResponse::created("Reply added.", reply_id),
        Ok(None) => ReviewActionResponse::outcome(MutationOutcome::NotFound, ""),
        Err(err) => ReviewActionResponse::failure(format!("review_add_reply failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_edit_comment(
    comment_id: String,
    reply_id: Option<String>,
    body: String,
) -> ReviewActionResponse {
    run_mutation("review_edit_comment", "Comment updated.", |store| {
        store.edit_comment(&comment_id, reply_id.as_deref(), body.trim())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_delete_thread(comment_id: String) -> ReviewActionResponse {
    run_mutation("review_delete_thread", "Thread deleted.", |store| {
        store.delete_thread(&comment_id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_toggle_resolved(comment_id: String) -> ReviewActionResponse {
    run_mutation("review_toggle_resolved", "Thread updated.", |store| {
        store.toggle_resolved(&comment_id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_add_reaction(
    comment_id: String,
    reply_id: Option<String>,
    emoji: String,
) -> ReviewActionResponse {
    run_mutation("review_add_reaction", "Reaction toggled.", |store| {
        store.add_reaction(&comment_id, reply_id.as_deref(), &emoji)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_open_popup(comment_id: String) {
    let _ = with_session(|session| session.comments.open_popup(comment_id));
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_close_popup() {
    let _ = with_session(|session| session.comments.close_popup());
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_active_popup() -> Option<String> {
    with_session(|session| session.comments.active_popup_id().map(str::to_string))
        .ok()
        .flatten()
}

/// Resolves the page to scroll to for a thread and opens its popup.
///
/// # FFI contract
/// - Returns `None` for unknown or standalone threads; the host keeps its
///   scroll position in that case.
#[flutter_rust_bridge::frb(sync)]
pub fn review_scroll_target(comment_id: String) -> Option<u32> {
    with_session(|session| {
        let mut navigator = LastTargetNavigator::default();
        session
            .comments
            .scroll_to_highlight(&comment_id, &mut navigator);
        navigator.last_page
    })
    .ok()
    .flatten()
}

/// Records the page count once the host finished loading the document.
#[flutter_rust_bridge::frb(sync)]
pub fn review_set_page_count(page_count: u32) {
    let _ = with_session(|session| session.comments.set_page_count(page_count));
}

#[flutter_rust_bridge::frb(sync)]
pub fn review_page_count() -> u32 {
    with_session(|session| session.comments.page_count()).unwrap_or(0)
}

/// Returns the active theme (`light|dark`), loading it on first call.
///
/// `system_prefers_dark` is only consulted when no preference is stored.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_current(system_prefers_dark: bool) -> String {
    with_theme(system_prefers_dark, |theme| theme.current())
        .map(|theme| theme.as_str().to_string())
        .unwrap_or_else(|_| fallback_theme(system_prefers_dark).to_string())
}

/// Flips and stores the theme; returns the new value.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle(system_prefers_dark: bool) -> String {
    with_theme(system_prefers_dark, |theme| theme.toggle())
        .map(|theme| theme.as_str().to_string())
        .unwrap_or_else(|_| fallback_theme(system_prefers_dark).to_string())
}

fn run_mutation(
    operation: &'static str,
    message: &'static str,
    f: impl FnOnce(&mut CommentStore<KvSnapshotStore<SqliteKvStore>>) -> MutationOutcome,
) -> ReviewActionResponse {
    match with_session(|session| f(&mut session.comments)) {
        Ok(outcome) => ReviewActionResponse::outcome(outcome, message),
        Err(err) => ReviewActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn with_theme<T>(
    system_prefers_dark: bool,
    f: impl FnOnce(&mut ThemeService<SqliteKvStore>) -> T,
) -> Result<T, String> {
    with_session(|session| -> Result<T, String> {
        if session.theme.is_none() {
            session.theme = Some(ThemeService::load(open_kv()?, system_prefers_dark));
        }
        match session.theme.as_mut() {
            Some(theme) => Ok(f(theme)),
            None => Err("theme unavailable".to_string()),
        }
    })?
}

fn with_session<T>(f: impl FnOnce(&mut ReviewSession) -> T) -> Result<T, String> {
    let mut guard = SESSION
        .lock()
        .map_err(|_| "review session lock poisoned".to_string())?;
    if guard.is_none() {
        let comments = CommentStore::load(KvSnapshotStore::new(open_kv()?));
        *guard = Some(ReviewSession {
            comments,
            theme: None,
        });
    }
    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => Err("review session unavailable".to_string()),
    }
}

fn open_kv() -> Result<SqliteKvStore, String> {
    let db_path = resolve_review_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_session module=ffi status=error error={err}");
        format!("review DB open failed: {err}")
    })?;
    SqliteKvStore::try_new(conn).map_err(|err| format!("review storage init failed: {err}"))
}

fn resolve_review_db_path() -> PathBuf {
    REVIEW_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("SCOPEFLOW_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(REVIEW_DB_FILE_NAME)
        })
        .clone()
}

fn fallback_theme(system_prefers_dark: bool) -> &'static str {
    if system_prefers_dark {
        "dark"
    } else {
        "light"
    }
}

fn to_thread_item(summary: ThreadSummary) -> ReviewThreadItem {
    ReviewThreadItem {
        comment_id: summary.id,
        author_name: summary.author_name,
        snippet: summary.snippet,
        reply_count: u32::try_from(summary.reply_count).unwrap_or(u32::MAX),
        resolved: summary.resolved,
        page_number: summary.page_number,
    }
}
