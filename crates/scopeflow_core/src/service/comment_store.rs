//! Comment store use-case service.
//!
//! # Responsibility
//! - Own the thread collection, the active popup id and the page count.
//! - Apply create/edit/delete/resolve/react operations.
//! - Persist the full collection after every applied mutation.
//!
//! # Invariants
//! - Ids are unique across roots and replies; generated ids never collide
//!   with existing ones.
//! - Roots are authored by the requester, replies by the reviewer, reactions
//!   by the requester.
//! - Unknown ids never fail: operations return `MutationOutcome::NotFound`
//!   and leave state untouched.
//! - Persistence failures are logged and swallowed; memory stays authoritative.

use crate::document::navigation::PageNavigator;
use crate::model::comment::{Comment, CommentId, CommentSource, Highlight};
use crate::model::seed::{requester, reviewer, seed_comments};
use crate::repo::snapshot_repo::CommentSnapshotStore;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const SNIPPET_MAX_CHARS: usize = 80;

/// Whether a mutation found its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    NotFound,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    fn found(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::NotFound
        }
    }
}

/// List-view projection of one thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSummary {
    pub id: CommentId,
    pub author_name: String,
    /// Single-line body preview, capped at 80 characters.
    pub snippet: String,
    pub reply_count: usize,
    pub resolved: bool,
    pub source: CommentSource,
    pub page_number: Option<u32>,
}

/// Callback invoked with the full collection after each applied mutation.
pub type ChangeHook = Box<dyn FnMut(&[Comment]) + Send>;

/// Explicitly constructed comment store over an injected persistence port.
pub struct CommentStore<P: CommentSnapshotStore> {
    persistence: P,
    threads: Vec<Comment>,
    active_popup_id: Option<CommentId>,
    page_count: u32,
    on_change: Option<ChangeHook>,
}

impl<P: CommentSnapshotStore> CommentStore<P> {
    /// Loads the last saved snapshot, falling back to fresh seed data when it
    /// is absent, empty or malformed.
    pub fn load(persistence: P) -> Self {
        let threads = match persistence.load_snapshot() {
            Ok(Some(threads)) => {
                info!(
                    "event=comments_load module=store status=ok origin=snapshot thread_count={}",
                    threads.len()
                );
                threads
            }
            Ok(None) => {
                info!("event=comments_load module=store status=ok origin=seed reason=absent");
                seed_comments()
            }
            Err(err) => {
                warn!(
                    "event=comments_load module=store status=fallback origin=seed error={}",
                    err
                );
                seed_comments()
            }
        };
        Self::with_threads(persistence, threads)
    }

    /// Creates a store with caller-provided initial state.
    ///
    /// Nothing is persisted until the first mutation.
    pub fn with_threads(persistence: P, threads: Vec<Comment>) -> Self {
        Self {
            persistence,
            threads,
            active_popup_id: None,
            page_count: 0,
            on_change: None,
        }
    }

    /// Registers the hook run after persistence on every applied mutation.
    pub fn set_on_change(&mut self, hook: ChangeHook) {
        self.on_change = Some(hook);
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn comments(&self) -> &[Comment] {
        &self.threads
    }

    pub fn thread(&self, comment_id: &str) -> Option<&Comment> {
        self.threads.iter().find(|c| c.id == comment_id)
    }

    pub fn active_popup_id(&self) -> Option<&str> {
        self.active_popup_id.as_deref()
    }

    /// Thread behind the active popup; `None` for dangling ids.
    pub fn active_thread(&self) -> Option<&Comment> {
        self.active_popup_id
            .as_deref()
            .and_then(|id| self.thread(id))
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Number of unresolved threads.
    pub fn open_thread_count(&self) -> usize {
        self.threads.iter().filter(|c| !c.resolved).count()
    }

    pub fn thread_summaries(&self) -> Vec<ThreadSummary> {
        self.threads
            .iter()
            .map(|c| ThreadSummary {
                id: c.id.clone(),
                author_name: c.author.name.clone(),
                snippet: snippet(&c.body),
                reply_count: c.replies.len(),
                resolved: c.resolved,
                source: c.source,
                page_number: c.highlight.as_ref().map(|h| h.page_number),
            })
            .collect()
    }

    /// Records the page count reported by the document viewer.
    pub fn set_page_count(&mut self, page_count: u32) {
        self.page_count = page_count;
    }

    /// Sets the active popup. The id is not checked against the collection.
    pub fn open_popup(&mut self, comment_id: impl Into<CommentId>) {
        self.active_popup_id = Some(comment_id.into());
    }

    pub fn close_popup(&mut self) {
        self.active_popup_id = None;
    }

    /// Appends a root comment by the requester and returns its id.
    ///
    /// Anchored comments immediately become the active popup.
    pub fn add_comment(
        &mut self,
        body: impl Into<String>,
        highlight: Option<Highlight>,
    ) -> CommentId {
        let id = self.fresh_id(None);
        let anchored = highlight.is_some();
        self.threads
            .push(Comment::new_root(id.clone(), requester(), body, highlight));
        if anchored {
            self.active_popup_id = Some(id.clone());
        }

        debug!("event=comment_add module=store status=ok comment_id={id} anchored={anchored}");
        self.commit("comment_add");
        id
    }

    /// Appends a reviewer reply to thread `comment_id`.
    ///
    /// Returns the reply id, or `None` when no root matches.
    pub fn add_reply(&mut self, comment_id: &str, body: impl Into<String>) -> Option<CommentId> {
        self.thread(comment_id)?;
        let reply_id = self.fresh_id(Some(comment_id));
        let root = self.threads.iter_mut().find(|c| c.id == comment_id)?;
        root.replies
            .push(Comment::new_reply(reply_id.clone(), reviewer(), body));

        debug!("event=reply_add module=store status=ok comment_id={comment_id} reply_id={reply_id}");
        self.commit("reply_add");
        Some(reply_id)
    }

    /// Rewrites the body of a root (`reply_id == None`) or one of its replies.
    pub fn edit_comment(
        &mut self,
        comment_id: &str,
        reply_id: Option<&str>,
        new_body: impl Into<String>,
    ) -> MutationOutcome {
        let Some(target) = self.target_mut(comment_id, reply_id) else {
            return not_found("comment_edit", comment_id);
        };
        target.body = new_body.into();
        self.commit("comment_edit");
        MutationOutcome::Applied
    }

    /// Removes a root together with all its replies.
    pub fn delete_thread(&mut self, comment_id: &str) -> MutationOutcome {
        let before = self.threads.len();
        self.threads.retain(|c| c.id != comment_id);
        let outcome = MutationOutcome::found(self.threads.len() != before);
        if self.active_popup_id.as_deref() == Some(comment_id) {
            self.active_popup_id = None;
        }

        if !outcome.is_applied() {
            return not_found("thread_delete", comment_id);
        }
        debug!("event=thread_delete module=store status=ok comment_id={comment_id}");
        self.commit("thread_delete");
        outcome
    }

    /// Flips `resolved` on a root. Reply ids never match.
    pub fn toggle_resolved(&mut self, comment_id: &str) -> MutationOutcome {
        let Some(root) = self.threads.iter_mut().find(|c| c.id == comment_id) else {
            return not_found("thread_resolve", comment_id);
        };
        root.resolved = !root.resolved;
        self.commit("thread_resolve");
        MutationOutcome::Applied
    }

    /// Toggles the requester's `emoji` reaction on a root or reply.
    pub fn add_reaction(
        &mut self,
        comment_id: &str,
        reply_id: Option<&str>,
        emoji: &str,
    ) -> MutationOutcome {
        let author = requester();
        let Some(target) = self.target_mut(comment_id, reply_id) else {
            return not_found("reaction_toggle", comment_id);
        };
        target.toggle_reaction(emoji, &author.name);
        self.commit("reaction_toggle");
        MutationOutcome::Applied
    }

    /// Scrolls to the thread's highlighted page and opens its popup.
    ///
    /// No-op for unknown ids and standalone threads.
    pub fn scroll_to_highlight(
        &mut self,
        comment_id: &str,
        navigator: &mut impl PageNavigator,
    ) -> MutationOutcome {
        let Some(page_number) = self
            .thread(comment_id)
            .and_then(|c| c.highlight.as_ref())
            .map(|h| h.page_number)
        else {
            return MutationOutcome::NotFound;
        };
        navigator.scroll_to_page(page_number);
        self.active_popup_id = Some(comment_id.to_string());
        MutationOutcome::Applied
    }

    pub fn scroll_to_page(&self, page_number: u32, navigator: &mut impl PageNavigator) {
        navigator.scroll_to_page(page_number);
    }

    /// Replaces the collection with fresh seed data and persists it.
    pub fn reset_to_seed(&mut self) {
        self.threads = seed_comments();
        self.active_popup_id = None;
        self.commit("comments_reset");
    }

    fn target_mut(&mut self, comment_id: &str, reply_id: Option<&str>) -> Option<&mut Comment> {
        let root = self.threads.iter_mut().find(|c| c.id == comment_id)?;
        match reply_id {
            None => Some(root),
            Some(reply_id) => root.reply_mut(reply_id),
        }
    }

    fn contains_id(&self, id: &str) -> bool {
        self.threads
            .iter()
            .any(|c| c.id == id || c.replies.iter().any(|r| r.id == id))
    }

    /// Generates an unused id; replies are prefixed with their root id.
    fn fresh_id(&self, parent: Option<&str>) -> CommentId {
        loop {
            let token = Uuid::new_v4().to_string();
            let id = match parent {
                Some(parent) => format!("{parent}-{token}"),
                None => token,
            };
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    fn commit(&mut self, trigger: &'static str) {
        if let Err(err) = self.persistence.save_snapshot(&self.threads) {
            warn!(
                "event=comments_persist module=store status=error trigger={} error={}",
                trigger, err
            );
        }
        if let Some(hook) = self.on_change.as_mut() {
            hook(&self.threads);
        }
    }
}

fn not_found(event: &'static str, comment_id: &str) -> MutationOutcome {
    debug!("event={event} module=store status=not_found comment_id={comment_id}");
    MutationOutcome::NotFound
}

fn snippet(body: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(body.trim(), " ");
    if collapsed.chars().count() <= SNIPPET_MAX_CHARS {
        return collapsed.into_owned();
    }
    let mut capped: String = collapsed.chars().take(SNIPPET_MAX_CHARS).collect();
    capped.push_str("...");
    capped
}
