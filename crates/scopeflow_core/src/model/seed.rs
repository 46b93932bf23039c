//! Seed identities, fallback threads and the document outline.
//!
//! Every call returns fresh values so callers can mutate them freely.

use super::comment::{Author, Comment, CommentSource, Highlight};

/// Root comments and reactions are authored by this identity.
pub fn requester() -> Author {
    Author::new("Alex", "Logistics Co", "A")
}

/// Replies are authored by this identity.
pub fn reviewer() -> Author {
    Author::new("Sarah Miller", "Team", "S")
}

/// Fallback collection used when no valid snapshot exists.
pub fn seed_comments() -> Vec<Comment> {
    let reply = Comment {
        id: "seed-1-r1".to_string(),
        author: reviewer(),
        body: "Yes, we can include that. We've updated the scope in Phase 2. \
               It will shift the timeline for that phase by 3 days."
            .to_string(),
        time_ago: "About 17 minutes ago".to_string(),
        highlight: None,
        reactions: Vec::new(),
        resolved: false,
        source: CommentSource::Annotation,
        replies: Vec::new(),
    };

    vec![Comment {
        id: "seed-1".to_string(),
        author: requester(),
        body: "Can we add real-time tracking to Phase 2? Our warehouse needs to \
               see where products are at all times."
            .to_string(),
        time_ago: "About 27 minutes ago".to_string(),
        highlight: Some(Highlight::new(2, "Phase 2: Inventory Management", 85.0, 42.0)),
        reactions: Vec::new(),
        resolved: false,
        source: CommentSource::Annotation,
        replies: vec![reply],
    }]
}

/// Side-panel outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineEntry {
    pub id: &'static str,
    pub label: &'static str,
}

pub const DOCUMENT_OUTLINE: &[OutlineEntry] = &[
    OutlineEntry {
        id: "introduction",
        label: "Introduction",
    },
    OutlineEntry {
        id: "phase-1",
        label: "Phase 1: Discovery",
    },
    OutlineEntry {
        id: "phase-2",
        label: "Phase 2: Development",
    },
    OutlineEntry {
        id: "phase-3",
        label: "Phase 3: Deployment",
    },
];
