//! Multi-key sorts and caller-supplied comparators

use std::cmp::Ordering;

use collatedb::SortKey;

use crate::test_utils::*;

fn a_number(doc: &Value) -> f64 {
    doc.get("a").and_then(Value::as_number).unwrap_or(f64::NAN)
}

// =============================================================================
// Custom comparator
// =============================================================================

#[test]
fn test_sort_with_custom_comparator() {
    let mut coll = json_collection(&[], abc_docs());
    let set = coll.chain().sort_by(|x, y| {
        a_number(x)
            .partial_cmp(&a_number(y))
            .unwrap_or(Ordering::Equal)
    });
    assert_eq!(set.count(), 3);
    assert_eq!(field_a(&set.data()), ints(&[1, 2, 5]));
}

#[test]
fn test_fallible_comparator_error_is_returned() {
    let mut coll = json_collection(&[], abc_docs());
    let err = coll
        .chain()
        .try_sort_by(|_, _| Err::<Ordering, _>(String::from("no order")))
        .unwrap_err();
    assert_eq!(err, "no order");
}

#[test]
#[should_panic(expected = "comparator blew up")]
fn test_panicking_comparator_propagates() {
    let mut coll = json_collection(&[], abc_docs());
    let _ = coll.chain().sort_by(|_, _| panic!("comparator blew up"));
}

// =============================================================================
// Compound sort
// =============================================================================

#[test]
fn test_compoundsort_ascending_keys() {
    let mut coll = json_collection(&[], abc_docs());
    let set = coll.chain().compoundsort(&[("b", false), ("c", false)]).unwrap();
    assert_eq!(field_a(&set.data()), ints(&[5, 1, 2]));
}

#[test]
fn test_compoundsort_descending_second_key() {
    let mut coll = json_collection(&[], abc_docs());
    let set = coll.chain().compoundsort(&[("b", false), ("c", true)]).unwrap();
    assert_eq!(field_a(&set.data()), ints(&[5, 2, 1]));
}

#[test]
fn test_compoundsort_nested_properties() {
    let docs = vec![
        json!({ "a": 1, "z": { "y": { "b": 9, "c": "first" } } }),
        json!({ "a": 5, "z": { "y": { "b": 7, "c": "second" } } }),
        json!({ "a": 2, "z": { "y": { "b": 9, "c": "third" } } }),
    ];
    let mut coll = json_collection(&["z.y.b", "z.y.c"], docs);

    let set = coll
        .chain()
        .compoundsort(&[("z.y.b", false), ("z.y.c", false)])
        .unwrap();
    assert_eq!(field_a(&set.data()), ints(&[5, 1, 2]));

    let set = coll
        .chain()
        .compoundsort(&[("z.y.b", false), ("z.y.c", true)])
        .unwrap();
    assert_eq!(field_a(&set.data()), ints(&[5, 2, 1]));
}

#[test]
fn test_compoundsort_with_parsed_keys() {
    let mut coll = json_collection(&[], abc_docs());
    let keys = vec![
        SortKey::new("b", true).unwrap(),
        SortKey::new("c", true).unwrap(),
    ];
    let set = coll.chain().compoundsort_keys(&keys);
    assert_eq!(field_a(&set.data()), ints(&[2, 1, 5]));
}

#[test]
fn test_compoundsort_invalid_key() {
    let mut coll = json_collection(&[], abc_docs());
    assert!(coll.chain().compoundsort(&[("b", false), ("", false)]).is_err());
}

#[test]
fn test_compoundsort_after_find() {
    let mut coll = json_collection(&[], abc_docs());
    let filter = Value::from(json!({ "b": { "$aeq": "9" } }));
    let set = coll
        .chain()
        .find(&filter)
        .unwrap()
        .compoundsort(&[("b", false), ("c", true)])
        .unwrap();
    assert_eq!(field_a(&set.data()), ints(&[2, 1]));
}
