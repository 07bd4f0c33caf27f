//! Testing utilities for tileprops workspace
//!
//! Shared hits, geometries and proptest strategies.

#![allow(missing_docs)]

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tileprops_document::DocumentRecord;

pub fn point(x: f64, y: f64) -> Value {
    json!({"type": "Point", "coordinates": [x, y]})
}

pub fn square_polygon(size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [size, 0.0], [size, size], [0.0, size], [0.0, 0.0]]]
    })
}

pub fn hit(index: &str, id: &str, source: Value) -> DocumentRecord {
    DocumentRecord::new().with_index(index).with_id(id).with_source(source)
}

/// `logs-1/abc` with a point under `geom`
pub fn sample_hit() -> DocumentRecord {
    hit(
        "logs-1",
        "abc",
        json!({"a": {"b": 1, "c": [1, 2, 3]}, "geom": {"type": "Point", "coordinates": [1, 2]}}),
    )
}

/// Search response body with `count` hits, each carrying a point at `location`
pub fn search_response_json(count: usize) -> String {
    let hits: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "_index": "places",
                "_id": format!("place-{i}"),
                "_score": 1.0,
                "_source": {
                    "name": format!("place {i}"),
                    "location": point(i as f64, -(i as f64)),
                    "tags": {"kind": "poi", "rank": i}
                },
                "fields": {"rank_label": [format!("#{i}"), "ignored"]}
            })
        })
        .collect();

    json!({"took": 1, "hits": {"total": {"value": count, "relation": "eq"}, "hits": hits}}).to_string()
}

/// Scalars and arrays, never objects
pub fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
        proptest::collection::vec(any::<i32>().prop_map(Value::from), 0..4).prop_map(Value::Array),
    ]
}

/// Nested object tree with dot-free keys
pub fn arb_source() -> impl Strategy<Value = Value> {
    let tree = arb_leaf().prop_recursive(4, 48, 5, |inner| {
        proptest::collection::btree_map("[a-z]{1,3}", inner, 0..5)
            .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>()))
    });

    proptest::collection::btree_map("[a-z]{1,3}", tree, 0..6)
        .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>()))
}
