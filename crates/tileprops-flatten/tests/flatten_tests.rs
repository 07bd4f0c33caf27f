use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use tileprops_document::{documents_from_json, DocumentRecord, SearchResponse};
use tileprops_flatten::{flatten, FlattenConfig, PropertyFlattener, ID_PROPERTY, INDEX_PROPERTY};
use tileprops_test_utils::{arb_source, hit, point, sample_hit, search_response_json, square_polygon};

/// Reference pre-order walk: every non-object value keyed by its dotted path
fn walk(prefix: &str, value: &Value, out: &mut BTreeMap<String, Value>) {
    let Value::Object(object) = value else { return };
    for (key, child) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match child {
            Value::Object(_) => walk(&path, child, out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

/// Dotted paths of every nested object in the tree
fn object_paths(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    let Value::Object(object) = value else { return };
    for (key, child) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if child.is_object() {
            out.push((path.clone(), child.clone()));
            object_paths(&path, child, out);
        }
    }
}

fn as_map(doc: &DocumentRecord, geometry: &str) -> BTreeMap<String, Value> {
    flatten(geometry, Some(doc)).into_owned().into_iter().collect()
}

#[test]
fn test_reference_example() {
    let doc = sample_hit();
    let expected: BTreeMap<String, Value> = [
        ("a.b", json!(1)),
        ("a.c", json!([1, 2, 3])),
        ("geom", json!({"type": "Point", "coordinates": [1, 2]})),
        ("_index", json!("logs-1")),
        ("_id", json!("abc")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    assert_eq!(as_map(&doc, "geom"), expected);
}

#[test]
fn test_siblings_under_geometry_are_not_flattened() {
    let doc = hit(
        "shapes",
        "s1",
        json!({"area": {"shape": square_polygon(2.0), "label": "sq"}}),
    );

    let props = flatten("area.shape", Some(&doc));

    for key in props.keys() {
        assert!(
            !key.starts_with("area.shape."),
            "{key} was flattened out of the geometry value"
        );
    }
    assert_eq!(props.get("area.shape"), Some(&square_polygon(2.0)));
    assert_eq!(props.get("area.label"), Some(&json!("sq")));
}

#[test]
fn test_geometry_deeper_than_designator_is_ignored() {
    // Designating a path inside the geometry only shields that exact leaf.
    let doc = hit("i", "1", json!({"geom": point(1.0, 2.0)}));
    let map = as_map(&doc, "geom.coordinates");
    assert_eq!(map.get("geom.type"), Some(&json!("Point")));
    assert_eq!(map.get("geom.coordinates"), Some(&json!([1.0, 2.0])));
}

#[test]
fn test_search_response_to_properties() {
    let body = search_response_json(3);
    let response = SearchResponse::from_json(&body).unwrap();
    let flattener = PropertyFlattener::new("location");

    let flat = flattener.flatten_all(response.documents());
    assert_eq!(flat.len(), 3);

    let second = &flat[1];
    assert_eq!(second.get("name"), Some(&json!("place 1")));
    assert_eq!(second.get("location"), Some(&point(1.0, -1.0)));
    assert_eq!(second.get("tags.kind"), Some(&json!("poi")));
    assert_eq!(second.get("tags.rank"), Some(&json!(1)));
    assert_eq!(second.get("rank_label"), Some(&json!("#1")));
    assert_eq!(second.get(ID_PROPERTY), Some(&json!("place-1")));
    assert_eq!(second.get(INDEX_PROPERTY), Some(&json!("places")));
    assert!(!second.contains_key("_score"));
}

#[test]
fn test_config_driven_features() {
    let config = FlattenConfig::from_toml_str(
        "geometry_field = \"location\"\ninclude_fields = false\nparallel_threshold = 2\n",
    )
    .unwrap();
    let flattener = PropertyFlattener::from_config(&config);

    let docs = documents_from_json(&search_response_json(5)).unwrap();
    let collection = flattener.to_feature_collection(&docs);

    assert_eq!(collection.len(), 5);
    for (i, feature) in collection.features.iter().enumerate() {
        assert_eq!(feature.geometry, Some(&point(i as f64, -(i as f64))));
        assert!(!feature.properties.contains_key("location"));
        assert!(!feature.properties.contains_key("rank_label"));
    }
}

#[test]
fn test_flattener_is_shareable_across_threads() {
    let docs = documents_from_json(&search_response_json(8)).unwrap();
    let flattener = PropertyFlattener::new("location");

    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = docs
            .chunks(2)
            .map(|chunk| {
                let flattener = &flattener;
                scope.spawn(move || chunk.iter().map(|d| flattener.flatten(d).len()).sum::<usize>())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // name, location, tags.kind, tags.rank, rank_label, _index, _id
    assert_eq!(counts, vec![14; 4]);
}

proptest! {
    #[test]
    fn prop_without_geometry_matches_preorder_walk(source in arb_source()) {
        let doc = DocumentRecord::new().with_source(source.clone());

        let mut expected = BTreeMap::new();
        walk("", &source, &mut expected);

        prop_assert_eq!(as_map(&doc, ""), expected);
    }

    #[test]
    fn prop_geometry_object_passes_through(source in arb_source()) {
        let doc = DocumentRecord::new().with_source(source.clone());

        let mut candidates = Vec::new();
        object_paths("", &source, &mut candidates);

        for (path, original) in candidates {
            let map = as_map(&doc, &path);
            let descendant_prefix = format!("{path}.");

            prop_assert_eq!(map.get(&path), Some(&original));
            prop_assert!(map.keys().all(|k| !k.starts_with(&descendant_prefix)));
        }
    }

    #[test]
    fn prop_metadata_never_shadowed(
        source in arb_source(),
        index in "[a-z]{1,8}",
        id in "[a-z0-9]{1,12}",
    ) {
        let mut source = source;
        if let Value::Object(object) = &mut source {
            object.insert("_index".to_string(), json!("shadow"));
            object.insert("_id".to_string(), json!({"nested": "shadow"}));
        }
        let doc = DocumentRecord::new()
            .with_index(index.clone())
            .with_id(id.clone())
            .with_source(source)
            .with_fields(json!({"_index": ["shadow"], "_id": "shadow"}));

        let props = flatten("_id", Some(&doc));
        prop_assert_eq!(props.get(INDEX_PROPERTY), Some(&json!(index)));
        prop_assert_eq!(props.get(ID_PROPERTY), Some(&json!(id)));
    }

    #[test]
    fn prop_missing_identifiers_never_forged(
        source in arb_source(),
        id in proptest::option::of("[a-z0-9]{1,12}"),
    ) {
        let mut source = source;
        if let Value::Object(object) = &mut source {
            object.insert("_index".to_string(), json!("forged"));
            object.insert("_id".to_string(), json!("forged"));
        }
        let mut doc = DocumentRecord::new()
            .with_source(source)
            .with_fields(json!({"_index": ["forged"], "_id": ["forged"]}));
        if let Some(id) = &id {
            doc = doc.with_id(id.clone());
        }

        let props = flatten("", Some(&doc));
        prop_assert!(!props.contains_key(INDEX_PROPERTY));
        let expected_id = id.map(Value::String);
        prop_assert_eq!(props.get(ID_PROPERTY), expected_id.as_ref());
    }

    #[test]
    fn prop_fields_collapse_to_first(values in proptest::collection::vec(any::<i64>(), 1..6)) {
        let doc = DocumentRecord::new().with_fields(json!({"f": values.clone()}));
        let props = flatten("", Some(&doc));
        prop_assert_eq!(props.get("f"), Some(&json!(values[0])));
    }
}
