//! Tests for dotted path access.

use serde_json::json;
use veneer::{create, freeze, path::normalize_path};

use crate::helpers::*;

#[test]
fn test_normalize_path() {
    assert_eq!(normalize_path("a.b.c"), "a.b.c");
    assert_eq!(normalize_path(".a..b."), "a.b");
    assert_eq!(normalize_path(""), "");
}

#[test]
fn test_get_path_through_maps_and_lists() {
    let draft = create(sample_base());

    assert_eq!(draft.get_path("items.0.c").and_then(|h| h.as_int()), Some(6));
    let tag = draft.get_path("user.tags.0").unwrap();
    assert_eq!(tag.as_text(), Some("x"));
    assert!(draft.get_path("items.1.c").is_none());
    assert!(draft.get_path("a.b").is_none());
}

#[test]
fn test_get_path_returns_stable_handles() {
    let draft = create(sample_base());
    let first = draft.get_path("items.0").unwrap();
    let second = draft.get_path("items.0").unwrap();
    assert!(first.same(&second));
}

#[test]
fn test_get_path_on_plain_value() {
    let plain = veneer::Handle::from(sample_base());
    let name = plain.get_path("user.name").unwrap();
    assert!(!name.is_overlay());
    assert_eq!(name.as_text(), Some("Alice"));
}

#[test]
fn test_set_path_writes_nested_values() {
    let base = sample_base();
    let draft = create(base.clone());

    draft.set_path("user.name", "Bob").unwrap();
    draft.set_path("user.tags.1", "y").unwrap();
    draft.set_path("items.0.d", json!({"deep": true})).unwrap();

    assert_eq!(
        draft.to_value().to_json(),
        json!({
            "a": 5,
            "user": {"name": "Bob", "tags": ["x", "y"]},
            "items": [{"c": 6, "d": {"deep": true}}]
        })
    );
    assert_eq!(base.to_json(), sample_base().to_json());
}

#[test]
fn test_set_path_reports_invalid_paths() {
    let draft = create(sample_base());

    let err = draft.set_path("nope.key", 1).unwrap_err();
    assert!(err.is_path_error());
    assert_eq!(err.path(), Some("nope.key"));

    assert!(draft.set_path("user.tags.first", 1).unwrap_err().is_path_error());
    assert!(draft.set_path("a.b", 1).unwrap_err().is_path_error());
    assert!(draft.set_path("...", 1).unwrap_err().is_path_error());
}

#[test]
fn test_set_path_on_frozen_targets() {
    let draft = create(sample_base());
    let _ = draft.get_path("user.tags");
    freeze(&draft, true).unwrap();

    // Map writes are ignored, list writes are rejected
    draft.set_path("user.name", "Bob").unwrap();
    let err = draft.set_path("user.tags.0", "y").unwrap_err();
    assert!(err.is_frozen_error());

    assert_eq!(draft.to_value().to_json(), sample_base().to_json());
}

#[test]
fn test_set_path_rejects_huge_list_index() {
    let draft = create(sample_base());

    let err = draft
        .set_path(&format!("user.tags.{}", usize::MAX), "y")
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(draft.to_value().to_json(), sample_base().to_json());
}
