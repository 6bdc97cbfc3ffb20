//! Tests for change tracking through materialized children.

use serde_json::json;
use veneer::{Handle, Value, create, has_changed, is_dirty};

#[test]
fn test_direct_write_is_a_change() {
    let draft = create(Value::from(json!({"a": 5})));
    assert!(!has_changed(&draft));

    draft.as_map().unwrap().set("a", 6).unwrap();
    assert!(has_changed(&draft));
    assert!(is_dirty(&draft));
}

#[test]
fn test_nested_write_propagates_through_list() {
    let draft = create(Value::from(json!({"a": 5, "b": [{"c": 6}]})));

    draft.set_path("b.0.c", 7).unwrap();

    assert!(has_changed(&draft));
    assert!(!is_dirty(&draft));
    assert!(has_changed(&draft.get_path("b").unwrap()));
    assert!(!is_dirty(&draft.get_path("b").unwrap()));
    assert!(is_dirty(&draft.get_path("b.0").unwrap()));
}

#[test]
fn test_remove_is_a_change() {
    let draft = create(Value::from(json!({"a": {"b": 1}})));
    draft.get_path("a").unwrap().as_map().unwrap().remove("b").unwrap();
    assert!(has_changed(&draft));
}

#[test]
fn test_materialization_alone_is_not_a_change() {
    let draft = create(Value::from(json!({"a": {"b": [1, {"c": 2}]}})));
    let _ = draft.get_path("a.b.1.c");
    assert!(!has_changed(&draft));
}

#[test]
fn test_noop_write_is_not_a_change() {
    let draft = create(Value::from(json!({"a": 5, "s": "x"})));
    let map = draft.as_map().unwrap();
    map.set("a", 5).unwrap();
    map.set("s", "x").unwrap();
    assert!(!has_changed(&draft));
}

#[test]
fn test_changes_behind_hidden_properties_are_not_reported() {
    use veneer::value::{Attributes, Map};

    let hidden = Attributes::DEFAULT.with_enumerable(false);
    let base = Value::from(Map::new().with_property("meta", Map::new().with("v", 1), hidden));
    let draft = create(base);

    draft.set_path("meta.v", 2).unwrap();
    assert!(has_changed(&draft.get_path("meta").unwrap()));
    assert!(!has_changed(&draft));
}

#[test]
fn test_hidden_changes_are_still_published() {
    use veneer::value::{Attributes, Map};

    let hidden = Attributes::DEFAULT.with_enumerable(false);
    let base = Value::from(
        Map::new()
            .with("shown", 1)
            .with_property("meta", Map::new().with("v", 1), hidden),
    );
    let draft = create(base.clone());

    draft.set_path("meta.v", 2).unwrap();

    let published = draft.to_value();
    assert!(!published.same(&base));
    let meta = published.as_map().unwrap().get("meta").unwrap().clone();
    assert_eq!(meta.as_map().unwrap().get("v"), Some(&Value::Int(2)));
    assert_eq!(published.to_json(), json!({"shown": 1}));
    let base_meta = base.as_map().unwrap().get("meta").unwrap();
    assert_eq!(base_meta.as_map().unwrap().get("v"), Some(&Value::Int(1)));
}

#[test]
fn test_plain_values_never_change() {
    assert!(!has_changed(&Handle::from(5)));
    assert!(!has_changed(&Handle::from(Value::from(json!({"a": 1})))));
}
