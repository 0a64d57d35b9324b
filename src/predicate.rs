//! Primitive predicates over JSON values.
//!
//! `null` is the single absence marker: it is never a String, Number, Boolean,
//! Array or Object.

use serde_json::Value;

pub fn is_string(v: &Value) -> bool {
    matches!(v, Value::String(_))
}

/// Finite numbers only; a NaN-like value is never a Number.
pub fn is_number(v: &Value) -> bool {
    match v {
        Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
        _ => false,
    }
}

pub fn is_object(v: &Value) -> bool {
    matches!(v, Value::Object(_))
}

pub fn is_boolean(v: &Value) -> bool {
    matches!(v, Value::Bool(_))
}

pub fn is_array(v: &Value) -> bool {
    matches!(v, Value::Array(_))
}

pub fn is_nothing(v: &Value) -> bool {
    v.is_null()
}

pub fn is_something(v: &Value) -> bool {
    !v.is_null()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absence_is_its_own_category() {
        let null = Value::Null;
        assert!(is_nothing(&null));
        assert!(!is_something(&null));
        for p in [is_string, is_number, is_object, is_boolean, is_array] {
            assert!(!p(&null));
        }
    }

    #[test]
    fn kinds_are_disjoint() {
        let samples = [json!("s"), json!(1.5), json!({}), json!(false), json!([])];
        let preds: [fn(&Value) -> bool; 5] = [is_string, is_number, is_object, is_boolean, is_array];
        for (i, v) in samples.iter().enumerate() {
            for (j, p) in preds.iter().enumerate() {
                assert_eq!(p(v), i == j, "sample {i} vs predicate {j}");
            }
            assert!(is_something(v));
        }
    }

    #[test]
    fn integers_and_floats_are_numbers() {
        assert!(is_number(&json!(0)));
        assert!(is_number(&json!(-7)));
        assert!(is_number(&json!(u64::MAX)));
        assert!(is_number(&json!(3.25)));
        assert!(!is_number(&json!("3")));
    }
}
