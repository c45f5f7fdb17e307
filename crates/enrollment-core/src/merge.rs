//! Reconciliation of two partial student payloads.
//!
//! The backend answers the id lookup and the pid lookup with overlapping but
//! differently populated records. [`merge_payloads`] folds them into one,
//! preferring populated values and keeping whatever either side has alone.

use serde_json::{Map, Value};
use tracing::debug;

/// Merge two optional payloads. `left` wins ties.
pub fn merge_payloads(left: Option<Value>, right: Option<Value>) -> Option<Value> {
    match (left, right) {
        (None, None) => None,
        (Some(left), None) => Some(left),
        (None, Some(right)) => Some(right),
        (Some(left), Some(right)) => Some(merge_value(left, right)),
    }
}

fn merge_value(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Object(left), Value::Object(right)) => Value::Object(merge_objects(left, right)),
        (Value::Array(left), Value::Array(right)) => {
            if right.len() > left.len() {
                debug!(left = left.len(), right = right.len(), "merge: taking longer right array");
                Value::Array(right)
            } else {
                Value::Array(left)
            }
        }
        (left, right) => {
            if is_empty(&left) && !is_empty(&right) {
                right
            } else {
                left
            }
        }
    }
}

fn merge_objects(mut left: Map<String, Value>, right: Map<String, Value>) -> Map<String, Value> {
    for (key, theirs) in right {
        let merged = match left.remove(&key) {
            Some(ours) => merge_value(ours, theirs),
            None => theirs,
        };
        left.insert(key, merged);
    }
    left
}

/// Null or a blank string.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn absent_sides() {
        assert_eq!(merge_payloads(None, None), None);
        assert_eq!(merge_payloads(Some(json!({"a": 1})), None), Some(json!({"a": 1})));
        assert_eq!(merge_payloads(None, Some(json!({"b": 2}))), Some(json!({"b": 2})));
    }

    #[test]
    fn empty_string_takes_other_side() {
        let merged = merge_payloads(
            Some(json!({"email": "", "pid": "P1"})),
            Some(json!({"email": "x@example.com", "pid": "P2"})),
        );
        assert_eq!(merged, Some(json!({"email": "x@example.com", "pid": "P1"})));
    }

    #[test]
    fn null_takes_other_side_but_zero_does_not() {
        let merged = merge_payloads(
            Some(json!({"gender": 0, "religion": null})),
            Some(json!({"gender": 1, "religion": "Hindu"})),
        );
        assert_eq!(merged, Some(json!({"gender": 0, "religion": "Hindu"})));
    }

    #[test]
    fn keys_from_either_side_are_kept() {
        let merged = merge_payloads(Some(json!({"a": 1})), Some(json!({"b": 2})));
        assert_eq!(merged, Some(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn nested_objects_recurse() {
        let merged = merge_payloads(
            Some(json!({"contactDetail": {"email": "", "primaryMobile": "9841"}})),
            Some(json!({"contactDetail": {"email": "a@b.c", "secondaryMobile": "9842"}})),
        );
        assert_eq!(
            merged,
            Some(json!({"contactDetail": {
                "email": "a@b.c",
                "primaryMobile": "9841",
                "secondaryMobile": "9842"
            }}))
        );
    }

    #[test]
    fn longer_array_wins() {
        let merged = merge_payloads(
            Some(json!({"addresses": [{"addressType": 0}]})),
            Some(json!({"addresses": [{"addressType": 0}, {"addressType": 1}]})),
        );
        assert_eq!(merged.unwrap()["addresses"].as_array().unwrap().len(), 2);

        let merged = merge_payloads(
            Some(json!({"documents": [{"filePath": "a"}]})),
            Some(json!({"documents": [{"filePath": "b"}]})),
        );
        assert_eq!(merged.unwrap()["documents"][0]["filePath"], "a");
    }

    #[test]
    fn empty_array_yields_to_populated_one() {
        let merged = merge_payloads(
            Some(json!({"parentGuardians": []})),
            Some(json!({"parentGuardians": [{"parentType": 0}]})),
        );
        assert_eq!(merged.unwrap()["parentGuardians"].as_array().unwrap().len(), 1);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z ]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-c]", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn merge_with_nothing_is_identity(value in arb_json()) {
            prop_assert_eq!(merge_payloads(Some(value.clone()), None), Some(value.clone()));
            prop_assert_eq!(merge_payloads(None, Some(value.clone())), Some(value));
        }

        #[test]
        fn merge_with_self_is_identity(value in arb_json()) {
            prop_assert_eq!(merge_payloads(Some(value.clone()), Some(value.clone())), Some(value));
        }
    }
}
