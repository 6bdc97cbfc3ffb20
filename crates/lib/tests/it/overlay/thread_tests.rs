//! Tests for sharing overlays between threads.

use std::thread;

use serde_json::json;
use veneer::{Handle, Value, create, freeze, has_changed, is_frozen};

use crate::helpers::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_handles_are_send_and_sync() {
    assert_send_sync::<Handle>();
    assert_send_sync::<Value>();
    assert_send_sync::<veneer::MapOverlay>();
    assert_send_sync::<veneer::ListOverlay>();
}

#[test]
fn test_frozen_tree_reads_from_many_threads() {
    let draft = create(sample_base());
    draft.set_path("user.name", "Bob").unwrap();
    let _ = draft.get_path("items.0");
    freeze(&draft, true).unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let name = draft.get_path("user.name").unwrap();
                    assert_eq!(name.as_text(), Some("Bob"));
                    assert_eq!(draft.get_path("items.0.c").and_then(|h| h.as_int()), Some(6));
                    assert!(is_frozen(&draft.get_path("items.0").unwrap()));
                }
            });
        }
    });

    assert!(has_changed(&draft));
}

#[test]
fn test_concurrent_first_reads_share_one_child() {
    let draft = create(sample_base());

    let children: Vec<Handle> = thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| draft.get_path("user").unwrap()))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let first = &children[0];
    assert!(children.iter().all(|child| child.same(first)));
    assert!(!has_changed(&draft));
}

#[test]
fn test_concurrent_writes_to_distinct_keys() {
    let base = sample_base();
    let draft = create(base.clone());
    let map = draft.as_map().unwrap();

    thread::scope(|scope| {
        for worker in 0..8i64 {
            scope.spawn(move || {
                map.set(format!("key{worker}"), worker).unwrap();
            });
        }
    });

    assert_eq!(map.len(), 11);
    for worker in 0..8i64 {
        assert_eq!(int_at(map, &format!("key{worker}")), Some(worker));
    }
    assert_eq!(base.to_json(), sample_base().to_json());
    assert_eq!(draft.to_value().to_json()["key3"], json!(3));
}
