//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `scopeflow_core` linkage without the Flutter runtime.
//! - Print the seed review session in a deterministic layout.

use scopeflow_core::{CommentStore, KvSnapshotStore, MemoryKvStore, DOCUMENT_OUTLINE};

fn main() {
    println!("scopeflow_core ping={}", scopeflow_core::ping());
    println!("scopeflow_core version={}", scopeflow_core::core_version());

    let kv = MemoryKvStore::new();
    let store = CommentStore::load(KvSnapshotStore::new(&kv));
    println!(
        "threads total={} open={}",
        store.comments().len(),
        store.open_thread_count()
    );
    for summary in store.thread_summaries() {
        let page = summary
            .page_number
            .map_or_else(|| "-".to_string(), |page| page.to_string());
        println!(
            "  [{}] page={} replies={} resolved={} {}: {}",
            summary.id,
            page,
            summary.reply_count,
            summary.resolved,
            summary.author_name,
            summary.snippet
        );
    }

    println!("outline:");
    for entry in DOCUMENT_OUTLINE {
        println!("  {} {}", entry.id, entry.label);
    }
}
