//! Single-key sorts
//!
//! The unindexed path sorts stably with the collator; the indexed path
//! reads the binary index. Both must agree everywhere.

use crate::test_utils::*;

fn four() -> Vec<serde_json::Value> {
    vec![
        json!({ "a": 4 }),
        json!({ "a": 7 }),
        json!({ "a": 3 }),
        json!({ "a": 9 }),
    ]
}

// =============================================================================
// Ascending
// =============================================================================

#[test]
fn test_simplesort_unindexed_ascending() {
    let mut coll = json_collection(&[], four());
    let set = coll.chain().simplesort("a", false).unwrap();
    assert_eq!(field_a(&set.data()), ints(&[3, 4, 7, 9]));
}

#[test]
fn test_simplesort_indexed_matches_unindexed() {
    let mut plain = json_collection(&[], four());
    let mut indexed = json_collection(&["a"], four());

    let expected = plain.chain().simplesort("a", false).unwrap().into_positions();
    let actual = indexed.chain().simplesort("a", false).unwrap().into_positions();
    assert_eq!(actual, expected);
    assert_eq!(indexed.index_positions("a").unwrap(), expected.as_slice());
}

// =============================================================================
// Descending
// =============================================================================

#[test]
fn test_simplesort_descending_unindexed() {
    let mut coll = json_collection(&[], four());
    let set = coll.chain().simplesort("a", true).unwrap();
    assert_eq!(field_a(&set.data()), ints(&[9, 7, 4, 3]));
}

#[test]
fn test_simplesort_descending_indexed() {
    let mut coll = json_collection(&["a"], four());
    let set = coll.chain().simplesort("a", true).unwrap();
    assert_eq!(field_a(&set.data()), ints(&[9, 7, 4, 3]));
}

#[test]
fn test_descending_does_not_reorder_ties() {
    // 7, "7" and 7.0 collate equal; their storage order survives descending
    let docs = vec![
        json!({ "a": 7, "id": 0 }),
        json!({ "a": 1, "id": 1 }),
        json!({ "a": "7", "id": 2 }),
        json!({ "a": 7.0, "id": 3 }),
    ];
    let mut plain = json_collection(&[], docs.clone());
    let mut indexed = json_collection(&["a"], docs);

    let p = plain.chain().simplesort("a", true).unwrap().into_positions();
    let i = indexed.chain().simplesort("a", true).unwrap().into_positions();
    assert_eq!(p, vec![0, 2, 3, 1]);
    assert_eq!(i, p);
}

// =============================================================================
// Nested paths
// =============================================================================

#[test]
fn test_simplesort_nested_property() {
    let docs = vec![
        json!({ "foo": { "a": 4 } }),
        json!({ "foo": { "a": 7 } }),
        json!({ "foo": { "a": 3 } }),
        json!({ "foo": { "a": 9 } }),
    ];
    let mut coll = json_collection(&[], docs);
    let nested = coll.chain().simplesort("foo.a", false).unwrap().into_positions();

    let mut flat = json_collection(&[], four());
    let top = flat.chain().simplesort("a", false).unwrap().into_positions();

    assert_eq!(nested, top);
    assert_eq!(nested, vec![2, 0, 1, 3]);
}

#[test]
fn test_simplesort_nested_property_indexed() {
    let docs = vec![
        json!({ "z": { "y": { "b": 2 } } }),
        json!({ "z": { "y": { "b": 1 } } }),
        json!({ "z": 5 }),
    ];
    let mut coll = json_collection(&["z.y.b"], docs);
    // Position 2 cannot resolve the path and sorts first
    let set = coll.chain().simplesort("z.y.b", false).unwrap();
    assert_eq!(set.positions(), &[2, 1, 0]);
}

#[test]
fn test_simplesort_missing_field_sorts_first() {
    let docs = vec![json!({ "a": 1 }), json!({}), json!({ "a": null })];
    let mut coll = json_collection(&[], docs);
    let set = coll.chain().simplesort("a", false).unwrap();
    assert_eq!(set.positions(), &[1, 2, 0]);
}
