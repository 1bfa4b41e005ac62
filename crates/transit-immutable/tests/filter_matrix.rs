use serde_json::json;
use transit_immutable::{with_filter, Codec, List, Map, OrderedMap, OrderedSet, Set, Value};

fn hide_underscored() -> Codec {
    with_filter(|_, key| {
        key.and_then(Value::as_str)
            .map_or(true, |k| !k.starts_with('_'))
    })
}

fn numbers_only() -> Codec {
    with_filter(|value, _| value.is_number())
}

fn round_trip(codec: &Codec, value: impl Into<Value>) -> Value {
    let text = codec.encode(&value.into()).expect("encode must succeed");
    codec.decode(&text).expect("decode must succeed")
}

#[test]
fn map_entries_are_dropped_at_every_depth() {
    let input = Map::new()
        .set("a", "foo")
        .set("_b", "bar")
        .set("c", Map::new().set("d", "deep").set("_e", "hide"));
    let result = round_trip(&hide_underscored(), input);
    assert_eq!(result.get("a"), Some(&Value::from("foo")));
    assert_eq!(result.get("_b"), None);
    assert_eq!(result.get_in(["c", "d"]), Some(&Value::from("deep")));
    assert_eq!(result.get_in(["c", "_e"]), None);
}

#[test]
fn ordered_map_entries_are_dropped_in_place() {
    let input = OrderedMap::new()
        .set("a", "baz")
        .set("_b", "bar")
        .set("c", OrderedMap::new().set("d", "deep").set("_e", "hide"));
    let codec = hide_underscored();
    let text = codec.encode(&input.into()).unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text).unwrap(),
        json!(["~#iOM", ["a", "baz", "c", ["^0", ["d", "deep"]]]])
    );
    let result = codec.decode(&text).unwrap();
    assert_eq!(result.get("a"), Some(&Value::from("baz")));
    assert_eq!(result.get("_b"), None);
    assert_eq!(result.get_in(["c", "d"]), Some(&Value::from("deep")));
    assert_eq!(result.get_in(["c", "_e"]), None);
}

#[test]
fn set_members_are_dropped() {
    let codec = numbers_only();
    let ordered = round_trip(&codec, OrderedSet::from_iter([1, 2, 3, 3]).insert("a"));
    assert!(!ordered.contains(&"a".into()));
    assert_eq!(ordered, OrderedSet::from_iter([1, 2, 3]).into());

    let unordered = round_trip(&codec, Set::from_iter([1, 2, 3, 3]).insert("a"));
    assert!(!unordered.contains(&"a".into()));
    assert_eq!(unordered.as_set().map(Set::len), Some(3));
}

#[test]
fn list_elements_are_dropped() {
    let input = List::from_iter([1, 2, 3, 3]).push("a");
    let result = round_trip(&numbers_only(), input);
    assert!(!result.contains(&"a".into()));
    assert_eq!(result, List::from_iter([1, 2, 3, 3]).into());
}

#[test]
fn sequences_and_sets_are_asked_without_a_key() {
    let codec = with_filter(|_, key| key.is_none());
    let list = round_trip(&codec, List::from_iter([1, 2]));
    assert_eq!(list, List::from_iter([1, 2]).into());
    let map = round_trip(&codec, Map::new().set("k", 1));
    assert_eq!(map, Map::new().into());
}

#[test]
fn native_containers_are_not_filtered() {
    let input = Value::from(json!({"_hidden": [1, "a"], "shown": true}));
    assert_eq!(round_trip(&hide_underscored(), input.clone()), input);
    assert_eq!(round_trip(&numbers_only(), input.clone()), input);
}

#[test]
fn filtering_is_encode_only() {
    let unfiltered = Codec::new()
        .encode(&Map::new().set("_b", 1).into())
        .unwrap();
    let result = hide_underscored().decode(&unfiltered).unwrap();
    assert_eq!(result.get("_b"), Some(&Value::Int(1)));
}
