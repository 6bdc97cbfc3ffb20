use serde_json::json;
use veneer::{Handle, ListOverlay, MapOverlay, Value, create};

/// Base value used by most overlay tests:
/// `{"a": 5, "user": {"name": "Alice", "tags": ["x"]}, "items": [{"c": 6}]}`
pub fn sample_base() -> Value {
    Value::from(json!({
        "a": 5,
        "user": {"name": "Alice", "tags": ["x"]},
        "items": [{"c": 6}]
    }))
}

/// Wraps `base` and returns the handle, asserting it is a map overlay
pub fn map_overlay(base: &Value) -> (Handle, MapOverlay) {
    let handle = create(base.clone());
    let map = handle
        .as_map()
        .cloned()
        .expect("base should wrap into a map overlay");
    (handle, map)
}

/// Reads `key` from a map overlay, expecting a map overlay child
pub fn child_map(map: &MapOverlay, key: &str) -> MapOverlay {
    map.get(key)
        .and_then(|h| h.as_map().cloned())
        .unwrap_or_else(|| panic!("expected map overlay under '{key}'"))
}

/// Reads `key` from a map overlay, expecting a list overlay child
pub fn child_list(map: &MapOverlay, key: &str) -> ListOverlay {
    map.get(key)
        .and_then(|h| h.as_list().cloned())
        .unwrap_or_else(|| panic!("expected list overlay under '{key}'"))
}

/// Reads an integer leaf from a map overlay
pub fn int_at(map: &MapOverlay, key: &str) -> Option<i64> {
    map.get(key).and_then(|h| h.as_int())
}

/// Resolves a dotted path on a plain value
pub fn base_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, part| match current {
        Value::Map(map) => map.get(part),
        Value::List(list) => list.get(part.parse().ok()?),
        _ => None,
    })
}
