//! Tests for ListOverlay.

use serde_json::json;
use veneer::{Overlay, Value, create, value::List};

use crate::helpers::*;

fn numbers() -> Value {
    Value::from(json!([3, 1, 2]))
}

fn ints(list: &veneer::ListOverlay) -> Vec<Option<i64>> {
    list.items()
        .iter()
        .map(|item| item.as_ref().and_then(|h| h.as_int()))
        .collect()
}

// ===== GROWTH ISOLATION =====

#[test]
fn test_push_does_not_grow_base() {
    let base = numbers();
    let handle = create(base.clone());
    let list = handle.as_list().unwrap();

    assert_eq!(list.push(4).unwrap(), 4);
    assert_eq!(list.unshift(0).unwrap(), 5);

    assert_eq!(base.as_list().unwrap().len(), 3);
    assert_eq!(base.to_json(), json!([3, 1, 2]));
    assert_eq!(handle.to_value().to_json(), json!([0, 3, 1, 2, 4]));
}

#[test]
fn test_nested_list_growth_is_isolated() {
    let base = sample_base();
    let (_, map) = map_overlay(&base);
    let tags = child_list(&child_map(&map, "user"), "tags");

    tags.push("y").unwrap();
    tags.set(5, "z").unwrap();

    assert_eq!(tags.len(), 6);
    assert_eq!(base.to_json()["user"]["tags"], json!(["x"]));
}

// ===== ELEMENT ACCESS =====

#[test]
fn test_branch_elements_are_overlays() {
    let (_, map) = map_overlay(&sample_base());
    let items = child_list(&map, "items");

    let first = items.get(0).unwrap();
    assert!(first.is_overlay());
    assert!(first.same(&items.get(0).unwrap()));
    assert!(items.get(1).is_none());
}

#[test]
fn test_set_within_bounds() {
    let handle = create(numbers());
    let list = handle.as_list().unwrap();
    list.set(1, 10).unwrap();

    assert_eq!(ints(list), vec![Some(3), Some(10), Some(2)]);
    assert!(list.is_dirty());
}

#[test]
fn test_set_same_value_still_marks_dirty() {
    let handle = create(numbers());
    let list = handle.as_list().unwrap();
    list.set(0, 3).unwrap();
    assert!(list.is_dirty());
}

#[test]
fn test_remove_leaves_hole_and_publishes_null() {
    let handle = create(numbers());
    let list = handle.as_list().unwrap();

    let removed = list.remove(0).unwrap();
    assert_eq!(removed.and_then(|h| h.as_int()), Some(3));
    assert_eq!(list.len(), 3);
    assert_eq!(list.indices(), vec![1, 2]);
    assert_eq!(handle.to_value().to_json(), json!([null, 1, 2]));
}

// ===== IN-PLACE OPERATIONS =====

#[test]
fn test_pop_and_shift() {
    let handle = create(numbers());
    let list = handle.as_list().unwrap();

    assert_eq!(list.pop().unwrap().and_then(|h| h.as_int()), Some(2));
    assert_eq!(list.shift().unwrap().and_then(|h| h.as_int()), Some(3));
    assert_eq!(ints(list), vec![Some(1)]);
}

#[test]
fn test_sort_by_value() {
    let handle = create(numbers());
    let list = handle.as_list().unwrap();

    list.sort_by(|a, b| a.as_int().cmp(&b.as_int())).unwrap();
    assert_eq!(ints(list), vec![Some(1), Some(2), Some(3)]);
    assert_eq!(numbers().to_json(), json!([3, 1, 2]));
}

#[test]
fn test_sort_can_read_through_child_overlays() {
    let base = Value::from(json!([{"n": 2}, {"n": 1}]));
    let handle = create(base.clone());
    let list = handle.as_list().unwrap();

    list.sort_by(|a, b| {
        let key = |h: &veneer::Handle| h.get_path("n").and_then(|n| n.as_int());
        key(a).cmp(&key(b))
    })
    .unwrap();

    assert_eq!(handle.to_value().to_json(), json!([{"n": 1}, {"n": 2}]));
    assert_eq!(base.to_json(), json!([{"n": 2}, {"n": 1}]));
}

#[test]
fn test_sort_result_is_dropped_when_frozen_mid_sort() {
    let handle = create(numbers());
    let list = handle.as_list().unwrap();

    let result = list.sort_by(|a, b| {
        veneer::freeze(&handle, false).unwrap();
        a.as_int().cmp(&b.as_int())
    });

    assert!(result.unwrap_err().is_frozen_error());
    assert_eq!(handle.to_value().to_json(), json!([3, 1, 2]));
}

#[test]
fn test_empty_list_overlay() {
    let handle = create(List::new());
    let list = handle.as_list().unwrap();
    assert!(list.is_empty());
    assert!(list.get(0).is_none());
    assert!(!list.is_dirty());
}
