//! Comment thread domain model.
//!
//! # Responsibility
//! - Define the record shared by thread roots and replies.
//! - Own the per-author reaction toggle rules.
//! - Check structural invariants of a whole collection.
//!
//! # Invariants
//! - `id` is unique across roots and replies of one collection.
//! - Only roots carry a `highlight`; replies never nest further.
//! - Each author holds at most one reaction per comment.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque comment identifier.
///
/// Seeded comments use readable ids (`seed-1`); generated ones are UUIDs.
pub type CommentId = String;

/// Relative-time label assigned to freshly created comments.
pub const JUST_NOW_LABEL: &str = "Just now";

/// Fixed identity attached to a comment or reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub role: String,
    pub avatar_letter: String,
}

impl Author {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        avatar_letter: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            avatar_letter: avatar_letter.into(),
        }
    }
}

/// Where a thread came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSource {
    /// Anchored to a document highlight.
    Annotation,
    /// Freestanding discussion.
    Standalone,
}

/// Reserved highlight geometry. Currently always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Document anchor of a root comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// 1-based page number.
    pub page_number: u32,
    /// Anchor text selected in the document.
    pub text: String,
    /// Pin position in percent of page width.
    pub pin_x: f64,
    /// Pin position in percent of page height.
    pub pin_y: f64,
    #[serde(default)]
    pub rects: Vec<HighlightRect>,
}

impl Highlight {
    pub fn new(page_number: u32, text: impl Into<String>, pin_x: f64, pin_y: f64) -> Self {
        Self {
            page_number,
            text: text.into(),
            pin_x,
            pin_y,
            rects: Vec::new(),
        }
    }
}

/// One emoji reaction by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub author_name: String,
}

/// Thread root or reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author: Author,
    pub body: String,
    /// Display-only label, never recomputed.
    pub time_ago: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub resolved: bool,
    pub source: CommentSource,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Creates a thread root labelled as just created.
    ///
    /// `source` follows the highlight: anchored roots are annotations.
    pub fn new_root(
        id: impl Into<CommentId>,
        author: Author,
        body: impl Into<String>,
        highlight: Option<Highlight>,
    ) -> Self {
        let source = if highlight.is_some() {
            CommentSource::Annotation
        } else {
            CommentSource::Standalone
        };
        Self {
            id: id.into(),
            author,
            body: body.into(),
            time_ago: JUST_NOW_LABEL.to_string(),
            highlight,
            reactions: Vec::new(),
            resolved: false,
            source,
            replies: Vec::new(),
        }
    }

    /// Creates a reply labelled as just created.
    pub fn new_reply(id: impl Into<CommentId>, author: Author, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author,
            body: body.into(),
            time_ago: JUST_NOW_LABEL.to_string(),
            highlight: None,
            reactions: Vec::new(),
            resolved: false,
            source: CommentSource::Annotation,
            replies: Vec::new(),
        }
    }

    pub fn reply(&self, reply_id: &str) -> Option<&Comment> {
        self.replies.iter().find(|reply| reply.id == reply_id)
    }

    pub fn reply_mut(&mut self, reply_id: &str) -> Option<&mut Comment> {
        self.replies.iter_mut().find(|reply| reply.id == reply_id)
    }

    /// Applies toggle-per-author reaction semantics.
    ///
    /// - Same author + same emoji: the reaction is removed.
    /// - Same author + other emoji: the old reaction is dropped and the new
    ///   one appended.
    pub fn toggle_reaction(&mut self, emoji: &str, author_name: &str) {
        let same = self
            .reactions
            .iter()
            .position(|r| r.emoji == emoji && r.author_name == author_name);
        if let Some(index) = same {
            self.reactions.remove(index);
            return;
        }

        self.reactions.retain(|r| r.author_name != author_name);
        self.reactions.push(Reaction {
            emoji: emoji.to_string(),
            author_name: author_name.to_string(),
        });
    }

    /// Returns the reaction of `author_name`, if any.
    pub fn reaction_of(&self, author_name: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.author_name == author_name)
    }
}

/// Structural violation found in a comment collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    DuplicateId(CommentId),
    HighlightOnReply(CommentId),
    NestedReply(CommentId),
}

impl Display for CommentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate comment id `{id}`"),
            Self::HighlightOnReply(id) => write!(f, "reply `{id}` must not carry a highlight"),
            Self::NestedReply(id) => write!(f, "reply `{id}` must not have replies"),
        }
    }
}

impl Error for CommentValidationError {}

/// Checks collection-wide invariants over roots and replies.
pub fn validate_threads(threads: &[Comment]) -> Result<(), CommentValidationError> {
    let mut seen = HashSet::new();
    for root in threads {
        if !seen.insert(root.id.as_str()) {
            return Err(CommentValidationError::DuplicateId(root.id.clone()));
        }
        for reply in &root.replies {
            if !seen.insert(reply.id.as_str()) {
                return Err(CommentValidationError::DuplicateId(reply.id.clone()));
            }
            if reply.highlight.is_some() {
                return Err(CommentValidationError::HighlightOnReply(reply.id.clone()));
            }
            if !reply.replies.is_empty() {
                return Err(CommentValidationError::NestedReply(reply.id.clone()));
            }
        }
    }
    Ok(())
}
