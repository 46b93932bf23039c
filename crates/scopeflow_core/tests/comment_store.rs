use scopeflow_core::{
    seed_comments, Comment, CommentSource, CommentStore, Highlight, KvSnapshotStore, KvStore,
    LastTargetNavigator, MemoryKvStore, MutationOutcome, COMMENTS_STORAGE_KEY,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn seeded(kv: &MemoryKvStore) -> CommentStore<KvSnapshotStore<&MemoryKvStore>> {
    CommentStore::load(KvSnapshotStore::new(kv))
}

fn stored_threads(kv: &MemoryKvStore) -> Vec<Comment> {
    let raw = kv
        .get_item(COMMENTS_STORAGE_KEY)
        .unwrap()
        .expect("snapshot should be written");
    serde_json::from_str(&raw).unwrap()
}

fn all_ids(threads: &[Comment]) -> Vec<String> {
    threads
        .iter()
        .flat_map(|c| std::iter::once(c.id.clone()).chain(c.replies.iter().map(|r| r.id.clone())))
        .collect()
}

fn page_three() -> Highlight {
    Highlight::new(3, "Phase 3: Deployment", 40.0, 12.5)
}

#[test]
fn empty_storage_loads_seed_without_writing() {
    let kv = MemoryKvStore::new();
    let store = seeded(&kv);

    assert_eq!(store.comments(), seed_comments().as_slice());
    assert!(store.active_popup_id().is_none());
    assert_eq!(store.page_count(), 0);
    assert!(kv.is_empty());
}

#[test]
fn toggle_resolved_flips_root_only() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    assert_eq!(store.toggle_resolved("seed-1"), MutationOutcome::Applied);

    let root = store.thread("seed-1").unwrap();
    assert!(root.resolved);
    assert!(!root.replies[0].resolved);
    assert_eq!(root.replies[0].id, "seed-1-r1");
    assert!(stored_threads(&kv)[0].resolved);

    assert_eq!(store.toggle_resolved("seed-1-r1"), MutationOutcome::NotFound);
    assert!(!store.thread("seed-1").unwrap().replies[0].resolved);
}

#[test]
fn standalone_comment_keeps_popup_closed() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    let id = store.add_comment("Looks good", None);

    let added = store.comments().last().unwrap();
    assert_eq!(added.id, id);
    assert_eq!(added.source, CommentSource::Standalone);
    assert_eq!(added.author.name, "Alex");
    assert_eq!(added.time_ago, "Just now");
    assert!(added.highlight.is_none());
    assert!(store.active_popup_id().is_none());
}

#[test]
fn anchored_comment_opens_popup() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    let id = store.add_comment("Check this", Some(page_three()));

    let added = store.thread(&id).unwrap();
    assert_eq!(added.source, CommentSource::Annotation);
    assert_eq!(added.highlight.as_ref().unwrap().page_number, 3);
    assert!(added.highlight.as_ref().unwrap().rects.is_empty());
    assert_eq!(store.active_popup_id(), Some(id.as_str()));
    assert_eq!(store.active_thread().map(|c| c.id.as_str()), Some(id.as_str()));
}

#[test]
fn reply_is_authored_by_reviewer() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    let reply_id = store.add_reply("seed-1", "On it.").unwrap();

    let root = store.thread("seed-1").unwrap();
    assert_eq!(root.replies.len(), 2);
    let reply = root.reply(&reply_id).unwrap();
    assert_eq!(reply.author.name, "Sarah Miller");
    assert_eq!(reply.source, CommentSource::Annotation);
    assert!(reply.highlight.is_none());
    assert!(reply_id.starts_with("seed-1-"));
}

#[test]
fn reply_to_unknown_thread_is_noop() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    assert!(store.add_reply("missing", "hello").is_none());
    assert_eq!(store.comments(), seed_comments().as_slice());
    assert!(kv.is_empty());
}

#[test]
fn ids_stay_unique_across_adds_and_deletes() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    let mut created = Vec::new();
    for round in 0..20 {
        let id = store.add_comment(format!("comment {round}"), None);
        store.add_reply(&id, "first");
        store.add_reply(&id, "second");
        store.add_reply("seed-1", "more");
        if round % 3 == 0 {
            store.delete_thread(&id);
        } else {
            created.push(id);
        }
    }

    let ids = all_ids(store.comments());
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(store.comments().len(), 1 + created.len());
}

#[test]
fn delete_removes_replies_and_blocks_resurrection() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    store.open_popup("seed-1");

    assert_eq!(store.delete_thread("seed-1"), MutationOutcome::Applied);
    assert!(store.thread("seed-1").is_none());
    assert!(store.active_popup_id().is_none());
    assert!(!all_ids(store.comments()).contains(&"seed-1-r1".to_string()));

    assert!(store.add_reply("seed-1", "too late").is_none());
    assert!(store.comments().is_empty());
    assert!(stored_threads(&kv).is_empty());
}

#[test]
fn delete_keeps_popup_of_other_thread() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    let id = store.add_comment("Check this", Some(page_three()));

    store.delete_thread("seed-1");
    assert_eq!(store.active_popup_id(), Some(id.as_str()));
    assert_eq!(store.delete_thread("seed-1"), MutationOutcome::NotFound);
}

#[test]
fn edit_targets_root_or_reply() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    assert_eq!(
        store.edit_comment("seed-1", None, "Root rewritten"),
        MutationOutcome::Applied
    );
    assert_eq!(
        store.edit_comment("seed-1", Some("seed-1-r1"), "Reply rewritten"),
        MutationOutcome::Applied
    );

    let root = store.thread("seed-1").unwrap();
    assert_eq!(root.body, "Root rewritten");
    assert_eq!(root.replies[0].body, "Reply rewritten");
    assert_eq!(stored_threads(&kv)[0].replies[0].body, "Reply rewritten");
}

#[test]
fn edit_with_unknown_ids_leaves_state_unchanged() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    assert_eq!(
        store.edit_comment("missing", None, "x"),
        MutationOutcome::NotFound
    );
    assert_eq!(
        store.edit_comment("seed-1", Some("missing"), "x"),
        MutationOutcome::NotFound
    );
    assert_eq!(store.comments(), seed_comments().as_slice());
}

#[test]
fn same_reaction_twice_restores_prior_state() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    let before = store.thread("seed-1").unwrap().reactions.clone();

    store.add_reaction("seed-1", None, "👍");
    assert_eq!(store.thread("seed-1").unwrap().reactions.len(), 1);
    store.add_reaction("seed-1", None, "👍");

    assert_eq!(store.thread("seed-1").unwrap().reactions, before);
}

#[test]
fn different_emoji_replaces_author_reaction() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    store.add_reaction("seed-1", Some("seed-1-r1"), "👍");
    store.add_reaction("seed-1", Some("seed-1-r1"), "🎉");

    let reply = store.thread("seed-1").unwrap().reply("seed-1-r1").unwrap();
    assert_eq!(reply.reactions.len(), 1);
    assert_eq!(reply.reactions[0].emoji, "🎉");
    assert_eq!(reply.reactions[0].author_name, "Alex");
    assert!(store.thread("seed-1").unwrap().reactions.is_empty());
}

#[test]
fn reaction_on_unknown_reply_is_noop() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    assert_eq!(
        store.add_reaction("seed-1", Some("nope"), "👍"),
        MutationOutcome::NotFound
    );
    assert_eq!(store.comments(), seed_comments().as_slice());
}

#[test]
fn scroll_to_highlight_navigates_and_opens_popup() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    let mut nav = LastTargetNavigator::default();

    assert_eq!(
        store.scroll_to_highlight("seed-1", &mut nav),
        MutationOutcome::Applied
    );
    assert_eq!(nav.last_page, Some(2));
    assert_eq!(store.active_popup_id(), Some("seed-1"));
}

#[test]
fn scroll_to_highlight_ignores_standalone_and_unknown() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    let standalone = store.add_comment("General note", None);
    let mut nav = LastTargetNavigator::default();

    assert_eq!(
        store.scroll_to_highlight(&standalone, &mut nav),
        MutationOutcome::NotFound
    );
    assert_eq!(
        store.scroll_to_highlight("missing", &mut nav),
        MutationOutcome::NotFound
    );
    assert!(nav.last_page.is_none());
    assert!(store.active_popup_id().is_none());

    store.scroll_to_page(4, &mut nav);
    assert_eq!(nav.last_page, Some(4));
}

#[test]
fn dangling_popup_id_is_tolerated() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    store.open_popup("ghost");
    assert_eq!(store.active_popup_id(), Some("ghost"));
    assert!(store.active_thread().is_none());

    store.close_popup();
    assert!(store.active_popup_id().is_none());
}

#[test]
fn page_count_is_recorded_without_persisting() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);

    store.set_page_count(7);
    assert_eq!(store.page_count(), 7);
    assert!(kv.is_empty());
}

#[test]
fn on_change_hook_sees_every_applied_mutation() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.set_on_change(Box::new(move |threads| {
        sink.lock().unwrap().push(threads.len());
    }));

    let id = store.add_comment("one", None);
    store.toggle_resolved(&id);
    store.toggle_resolved("missing");
    store.delete_thread(&id);

    assert_eq!(*seen.lock().unwrap(), vec![2, 2, 1]);
}

#[test]
fn summaries_report_snippets_and_counts() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    let id = store.add_comment("  Multi\nline   body ", None);
    store.toggle_resolved("seed-1");

    let summaries = store.thread_summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].reply_count, 1);
    assert_eq!(summaries[0].page_number, Some(2));
    assert!(summaries[0].resolved);
    assert_eq!(summaries[1].id, id);
    assert_eq!(summaries[1].snippet, "Multi line body");
    assert_eq!(summaries[1].page_number, None);
    assert_eq!(store.open_thread_count(), 1);
}

#[test]
fn reset_to_seed_discards_local_edits() {
    let kv = MemoryKvStore::new();
    let mut store = seeded(&kv);
    store.add_comment("temp", Some(page_three()));
    store.delete_thread("seed-1");

    store.reset_to_seed();
    assert_eq!(store.comments(), seed_comments().as_slice());
    assert!(store.active_popup_id().is_none());
    assert_eq!(stored_threads(&kv), seed_comments());
}
